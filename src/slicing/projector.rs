//! Contour projection into screen space

use cgmath::{Matrix4, Point3};

use super::colorizer::Rgba;
use crate::{
    geometry::{Contour, ContourSet},
    gfx::camera::{transform_point, transform_point_affine},
};

/// A stroked 2D path in top-left-origin pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenPolyline {
    pub points: Vec<[f32; 2]>,
    pub stroke_width: f32,
    pub color: Rgba,
}

/// How a contour vertex goes through the projector's matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// `(x, y, z, 1)` is transformed and `w` is dropped. Used for slices.
    Affine,
    /// Homogeneous transform followed by the divide by `w`. Used for
    /// hidden-line edges.
    Perspective,
}

/// Maps 3D contours through a frame matrix into pixel space.
///
/// The matrix produces Y-up pixels; the projector flips them to Y-down with
/// `h - y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourProjector {
    matrix: Matrix4<f64>,
    height: f64,
    projection: Projection,
}

impl ContourProjector {
    /// Slice projector: no perspective divide.
    pub fn new(matrix: Matrix4<f64>, height: u32) -> Self {
        Self {
            matrix,
            height: height as f64,
            projection: Projection::Affine,
        }
    }

    /// Hidden-line projector: divides by `w`.
    pub fn perspective(matrix: Matrix4<f64>, height: u32) -> Self {
        Self {
            projection: Projection::Perspective,
            ..Self::new(matrix, height)
        }
    }

    pub fn project_point(&self, point: Point3<f64>) -> [f32; 2] {
        let p = match self.projection {
            Projection::Affine => transform_point_affine(&self.matrix, point),
            Projection::Perspective => transform_point(&self.matrix, point),
        };
        [p.x as f32, (self.height - p.y) as f32]
    }

    /// One path per contour. A single-vertex contour stays a one-point path.
    pub fn project_contour(&self, contour: &Contour) -> Vec<[f32; 2]> {
        contour.iter().map(|p| self.project_point(*p)).collect()
    }

    /// Projects every non-empty contour, keeping input order.
    pub fn project(&self, contours: &ContourSet) -> Vec<Vec<[f32; 2]>> {
        contours
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| self.project_contour(c))
            .collect()
    }
}

/// Inverse of the Y flip applied by [`ContourProjector`].
pub fn unflip_y(screen_y: f64, height: u32) -> f64 {
    height as f64 - screen_y
}
