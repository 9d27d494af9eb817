//! # Slicing
//!
//! The per-frame core: planes are planned, cut through the mesh, projected to
//! pixels and colored, then collected into a [`Frame`].

pub mod colorizer;
pub mod frame;
pub mod planner;
pub mod projector;

pub use colorizer::{hsl, Rgba, SliceColorizer};
pub use frame::{Frame, FrameAssembler, RenderMode};
pub use planner::{SlicePlane, SlicePlanner};
pub use projector::{unflip_y, ContourProjector, Projection, ScreenPolyline};
