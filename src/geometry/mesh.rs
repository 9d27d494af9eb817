//! # Triangle Mesh
//!
//! Immutable triangle soup used by the slicing pipeline. Meshes come from a
//! Wavefront OBJ file (through `tobj`) or from the procedural primitives, and
//! are normalized once with [`Mesh::unit_cube`] before the first frame.

use std::path::Path;

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3};

use super::{
    bvh::{Bvh, DEFAULT_LEAF_SIZE},
    ray::{Aabb, Ray},
};
use crate::{
    error::{Result, ViewError},
    gfx::camera::transform_point,
};

const RAY_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Point3<f64>,
    pub b: Point3<f64>,
    pub c: Point3<f64>,
}

impl Triangle {
    pub fn new(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        Self { a, b, c }
    }

    pub fn vertices(&self) -> [Point3<f64>; 3] {
        [self.a, self.b, self.c]
    }

    pub fn edges(&self) -> [(Point3<f64>, Point3<f64>); 3] {
        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            Point3::new(
                self.a.x.min(self.b.x).min(self.c.x),
                self.a.y.min(self.b.y).min(self.c.y),
                self.a.z.min(self.b.z).min(self.c.z),
            ),
            Point3::new(
                self.a.x.max(self.b.x).max(self.c.x),
                self.a.y.max(self.b.y).max(self.c.y),
                self.a.z.max(self.b.z).max(self.c.z),
            ),
        )
    }

    pub fn transform(&self, matrix: &Matrix4<f64>) -> Self {
        Self::new(
            transform_point(matrix, self.a),
            transform_point(matrix, self.b),
            transform_point(matrix, self.c),
        )
    }

    /// Möller–Trumbore. Hits closer than a small epsilon are ignored so a ray
    /// leaving the surface does not hit its own triangle.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f64> {
        let e1 = self.b - self.a;
        let e2 = self.c - self.a;
        let p = ray.direction.cross(e2);
        let det = e1.dot(p);
        if det.abs() < RAY_EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let s = ray.origin - self.a;
        let u = s.dot(p) * inv;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(e1);
        let v = ray.direction.dot(q) * inv;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(q) * inv;
        (t > RAY_EPSILON).then_some(t)
    }
}

/// An immutable collection of triangles with cached bounds and a bounding
/// volume hierarchy for ray casts.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    bounds: Option<Aabb>,
    bvh: Bvh,
}

impl Mesh {
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        let bounds = Aabb::from_points(triangles.iter().flat_map(Triangle::vertices));
        let bvh = Bvh::build(&triangles, DEFAULT_LEAF_SIZE);
        Self {
            triangles,
            bounds,
            bvh,
        }
    }

    /// Builds a mesh from flat `xyz` positions and triangle indices.
    ///
    /// Index triples that reference missing positions are skipped.
    pub fn from_indexed(positions: &[f32], indices: &[u32]) -> Self {
        let vertex = |i: u32| -> Option<Point3<f64>> {
            let i = i as usize * 3;
            let p = positions.get(i..i + 3)?;
            Some(Point3::new(p[0] as f64, p[1] as f64, p[2] as f64))
        };

        let triangles = indices
            .chunks_exact(3)
            .filter_map(|tri| Some(Triangle::new(vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?)))
            .collect();

        Self::from_triangles(triangles)
    }

    /// Loads every model of an OBJ file into one mesh.
    ///
    /// Materials are not needed for a wireframe view and are ignored.
    pub fn load_obj(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )?;

        let mut triangles = Vec::new();
        for model in &models {
            let mesh = Self::from_indexed(&model.mesh.positions, &model.mesh.indices);
            log::debug!(
                "OBJ model '{}': {} triangles",
                model.name,
                mesh.triangle_count()
            );
            triangles.extend(mesh.triangles);
        }

        if triangles.is_empty() {
            return Err(ViewError::EmptyMesh);
        }

        log::info!(
            "loaded {} ({} models, {} triangles)",
            path.display(),
            models.len(),
            triangles.len()
        );
        Ok(Self::from_triangles(triangles))
    }

    /// Scales uniformly so the largest extent is 1 and centres the bounds on
    /// the origin.
    pub fn unit_cube(self) -> Self {
        let Some(bounds) = self.bounds else {
            return self;
        };
        let size = bounds.size();
        let extent = size.x.max(size.y).max(size.z);
        let scale = if extent > 0.0 { 1.0 / extent } else { 1.0 };

        let matrix = Matrix4::from_scale(scale)
            * Matrix4::from_translation(-bounds.center().to_vec());
        self.transform(&matrix)
    }

    pub fn transform(&self, matrix: &Matrix4<f64>) -> Self {
        Self::from_triangles(self.triangles.iter().map(|t| t.transform(matrix)).collect())
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Nearest hit distance along `ray`, if any.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f64> {
        self.bvh.intersect_ray(&self.triangles, ray)
    }
}
