//! # Primitive Shape Generation
//!
//! Procedural meshes for running the viewer without a model file
//! (`builtin:cube`, `builtin:sphere`) and for tests.

use std::f32::consts::PI;

use super::mesh::Mesh;

/// Prefix of model paths that name a procedural primitive.
pub const BUILTIN_PREFIX: &str = "builtin:";

/// Generate a unit cube centered at the origin
///
/// Returns a cube with vertices from -0.5 to 0.5 on all axes, two
/// counter-clockwise triangles per face.
pub fn generate_cube() -> Mesh {
    #[rustfmt::skip]
    let positions = [
        -0.5, -0.5,  0.5,   0.5, -0.5,  0.5,   0.5,  0.5,  0.5,  -0.5,  0.5,  0.5,
        -0.5, -0.5, -0.5,  -0.5,  0.5, -0.5,   0.5,  0.5, -0.5,   0.5, -0.5, -0.5,
    ];

    #[rustfmt::skip]
    let indices = [
        // Front
        0, 1, 2,  2, 3, 0,
        // Back
        4, 5, 6,  6, 7, 4,
        // Left
        4, 0, 3,  3, 5, 4,
        // Right
        1, 7, 6,  6, 2, 1,
        // Top
        3, 2, 6,  6, 5, 3,
        // Bottom
        4, 7, 1,  1, 0, 4,
    ];

    Mesh::from_indexed(&positions, &indices)
}

/// Generate a UV sphere of radius 1.0 centered at the origin
///
/// # Arguments
/// * `longitude_segments` - Number of vertical segments (at least 3)
/// * `latitude_segments` - Number of horizontal segments (at least 2)
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> Mesh {
    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    let mut positions = Vec::new();
    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            positions.extend_from_slice(&[
                theta.sin() * phi.cos(),
                theta.cos(),
                theta.sin() * phi.sin(),
            ]);
        }
    }

    let mut indices = Vec::new();
    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;
            indices.extend_from_slice(&[first, second, first + 1]);
            indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    Mesh::from_indexed(&positions, &indices)
}

/// Resolves `builtin:<name>` model paths.
pub fn builtin_mesh(path: &str) -> Option<Mesh> {
    match path.strip_prefix(BUILTIN_PREFIX)? {
        "cube" => Some(generate_cube()),
        "sphere" => Some(generate_sphere(32, 16)),
        _ => None,
    }
}
