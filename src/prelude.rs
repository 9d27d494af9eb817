//! # Slicescope Prelude
//!
//! Commonly used types in one import:
//!
//! ```no_run
//! use slicescope::prelude::*;
//!
//! let frames = FrameAssembler::new(generate_cube(), MeshGeometry, ViewerConfig::default());
//! let frame = frames.compose_frame(0.0, (800, 600)).unwrap();
//! ```

// Re-export core application types
pub use crate::app::SlicerApp;
pub use crate::config::ViewerConfig;
pub use crate::error::{Result, ViewError};

// Geometry
pub use crate::geometry::{
    generate_cube, generate_sphere, Contour, ContourSet, Geometry, HiddenLineView, Mesh,
    MeshGeometry, Plane,
};

// Per-frame pipeline
pub use crate::gfx::camera::{compose, CameraPipeline, TransformStage, Viewport};
pub use crate::render_loop::{FramePacing, RenderLoop, SessionClock};
pub use crate::slicing::{
    ContourProjector, Frame, FrameAssembler, RenderMode, Rgba, ScreenPolyline, SliceColorizer,
    SlicePlanner,
};

// Re-export common external dependencies
pub use cgmath::{Matrix4, Point3, Vector3};
