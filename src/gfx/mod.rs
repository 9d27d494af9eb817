//! # Graphics Module
//!
//! Camera transforms and the wgpu stroke renderer.
//!
//! - **Camera Pipeline** ([`camera`]) - the per-frame rotate, view and
//!   projection chain, plus viewport handling
//! - **Rendering** ([`rendering`]) - polyline tessellation and frame submission

pub mod camera;
pub mod rendering;

// Re-export commonly used types
pub use camera::{CameraPipeline, Viewport};
pub use rendering::render_engine::RenderEngine;
