//! # Geometry
//!
//! Mesh data and the three geometric operations the frame pipeline needs:
//! cutting the mesh with a plane, simplifying the resulting polylines, and
//! computing the visible edges of the whole mesh. The operations sit behind
//! the [`Geometry`] trait so frame assembly can run against a stand-in.

pub mod bvh;
pub mod hidden_line;
pub mod intersect;
pub mod mesh;
pub mod primitives;
pub mod ray;
pub mod simplify;

use cgmath::{Matrix4, Point3, Vector3};

pub use bvh::Bvh;
pub use hidden_line::HiddenLineView;
pub use mesh::{Mesh, Triangle};
pub use primitives::{builtin_mesh, generate_cube, generate_sphere};
pub use ray::{Aabb, Ray};

/// An ordered, open polyline. A loop is closed only by repeating its first
/// point.
pub type Contour = Vec<Point3<f64>>;

/// All contours produced by one intersection or one hidden-line pass.
pub type ContourSet = Vec<Contour>;

/// A cutting plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl Plane {
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { point, normal }
    }

    /// The plane `y = height`, normal pointing up.
    pub fn horizontal(height: f64) -> Self {
        Self::new(Point3::new(0.0, height, 0.0), Vector3::unit_y())
    }
}

/// Geometric operations used to build a frame.
pub trait Geometry {
    /// Contours where `plane` cuts `mesh`.
    fn intersect(&self, plane: &Plane, mesh: &Mesh) -> ContourSet;

    /// Simplifies each contour, keeping its endpoints.
    fn simplify(&self, contours: ContourSet, tolerance: f64) -> ContourSet;

    /// Edges of `mesh` visible from `view` once `model` is applied.
    ///
    /// The returned contours are in the mesh's own coordinates. Unlike slice
    /// contours they must be projected through `model`, the view, the
    /// perspective and the screen map with a divide by `w`.
    fn render_hidden_line(
        &self,
        mesh: &Mesh,
        model: &Matrix4<f64>,
        view: &HiddenLineView,
    ) -> ContourSet;
}

/// The CPU implementation of [`Geometry`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MeshGeometry;

impl Geometry for MeshGeometry {
    fn intersect(&self, plane: &Plane, mesh: &Mesh) -> ContourSet {
        intersect::intersect_mesh(plane, mesh)
    }

    fn simplify(&self, contours: ContourSet, tolerance: f64) -> ContourSet {
        simplify::simplify_contours(contours, tolerance)
    }

    fn render_hidden_line(
        &self,
        mesh: &Mesh,
        model: &Matrix4<f64>,
        view: &HiddenLineView,
    ) -> ContourSet {
        hidden_line::render_hidden_line(mesh, model, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    #[test]
    fn test_horizontal_plane() {
        let plane = Plane::horizontal(-0.25);
        assert_eq!(plane.point, Point3::new(0.0, -0.25, 0.0));
        assert_eq!(plane.normal, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_mesh_geometry_slices_and_simplifies_cube() {
        let geometry = MeshGeometry;
        let cube = generate_cube();
        let contours = geometry.intersect(&Plane::horizontal(0.0), &cube);
        let simplified = geometry.simplify(contours, 1e-6);

        assert_eq!(simplified.len(), 1);
        // The face diagonals add collinear midpoints; only the loop's start
        // and the four corners remain once they are removed.
        assert!(simplified[0].len() <= 6);
        assert_eq!(simplified[0].first(), simplified[0].last());
    }

    #[test]
    fn test_mesh_geometry_hidden_line_is_deterministic() {
        let geometry = MeshGeometry;
        let cube = generate_cube();
        let view = HiddenLineView {
            width: 200,
            height: 200,
            ..HiddenLineView::default()
        };
        let model = Matrix4::identity();
        let a = geometry.render_hidden_line(&cube, &model, &view);
        let b = geometry.render_hidden_line(&cube, &model, &view);
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }
}
