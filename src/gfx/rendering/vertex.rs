//! # Vertex Data Structures
//!
//! GPU vertex format of the stroke pipeline.

/// A stroke vertex in top-left-origin pixel coordinates.
///
/// # Memory Layout
///
/// `#[repr(C)]` keeps the layout stable for `bytemuck` uploads.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StrokeVertex {
    /// Pixel position [x, y], Y pointing down
    pub position: [f32; 2],
    /// sRGB-encoded RGBA color, passed through unconverted
    pub color: [f32; 4],
}

impl StrokeVertex {
    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: Position (Float32x2) at shader location 0
    /// - Attribute 1: Color (Float32x4) at shader location 1
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<StrokeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}
