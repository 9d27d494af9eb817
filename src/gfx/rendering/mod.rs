// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Stroke tessellation, the render pipeline and frame submission.

pub mod pipeline_manager;
pub mod render_engine;
pub mod stroke;
pub mod vertex;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
pub use stroke::tessellate;
pub use vertex::StrokeVertex;
