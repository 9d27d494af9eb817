// src/lib.rs
//! slicescope
//!
//! An animated layered-slice wireframe viewer: a triangle mesh is cut by a
//! stack of horizontal planes and the contours are drawn, colored by height,
//! while the mesh rotates. A hidden-line view of the whole mesh is available
//! as an alternate mode.

pub mod app;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gfx;
pub mod performance;
pub mod prelude;
pub mod render_loop;
pub mod slicing;

// Re-export main types for convenience
pub use app::SlicerApp;
pub use config::ViewerConfig;
pub use error::{Result, ViewError};
