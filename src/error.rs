//! Error types for the slicescope viewer
//!
//! The frame pipeline itself is numeric and infallible once its inputs are
//! valid; everything that can go wrong is caught at the boundary (viewport
//! construction, mesh loading, surface acquisition) and reported here.

/// Errors surfaced by the viewer pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    /// Width or height is zero, which would turn the aspect ratio and the
    /// screen mapping into NaN/Inf.
    #[error("invalid viewport {width}x{height}: width and height must be non-zero")]
    InvalidViewport { width: u32, height: u32 },

    /// The mesh contains no triangles.
    #[error("mesh contains no triangles")]
    EmptyMesh,

    /// The OBJ file could not be read or parsed.
    #[error("failed to load OBJ mesh: {0}")]
    MeshLoad(#[from] tobj::LoadError),

    /// The GPU adapter, device or window surface could not be set up or
    /// failed to provide a texture to draw into.
    #[error("surface unavailable: {0}")]
    Surface(String),
}

pub type Result<T> = std::result::Result<T, ViewError>;
