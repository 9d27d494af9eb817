pub mod camera_pipeline;
pub mod camera_utils;

// Re-export main types
pub use camera_pipeline::{compose, compose_affine, CameraPipeline, TransformStage};
pub use camera_utils::{transform_point, transform_point_affine, Viewport, ViewportUniform};
