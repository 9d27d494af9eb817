//! Hidden-line rendering of a whole mesh
//!
//! Every edge is sampled at a fixed step; a sample survives when it is inside
//! the view volume and nothing lies between it and the eye. Runs of surviving
//! samples become contours.

use std::collections::HashSet;

use cgmath::{Deg, Matrix4, MetricSpace, Point3, SquareMatrix, Vector3};

use super::{
    mesh::Mesh,
    ray::{Aabb, Ray},
    simplify::simplify_contours,
    Contour, ContourSet,
};
use crate::{
    config::{ViewerConfig, SIMPLIFY_TOLERANCE},
    gfx::camera::{compose, transform_point, TransformStage, Viewport},
};

/// Camera and sampling parameters of one hidden-line pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HiddenLineView {
    pub eye: Point3<f64>,
    pub center: Point3<f64>,
    pub up: Vector3<f64>,
    pub width: u32,
    pub height: u32,
    pub fov_degrees: f64,
    pub near: f64,
    pub far: f64,
    /// Distance between visibility samples along an edge.
    pub step: f64,
    pub tolerance: f64,
}

impl HiddenLineView {
    pub fn from_config(config: &ViewerConfig, viewport: Viewport) -> Self {
        Self {
            eye: config.eye,
            center: config.center,
            up: config.up,
            width: viewport.width(),
            height: viewport.height(),
            fov_degrees: config.fov_degrees,
            near: config.near,
            far: config.far,
            step: config.hidden_line_step,
            tolerance: config.simplify_tolerance,
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height.max(1) as f64
    }

    /// World to clip space.
    pub fn view_projection(&self) -> Matrix4<f64> {
        compose(&[
            TransformStage::View {
                eye: self.eye,
                center: self.center,
                up: self.up,
            },
            TransformStage::Perspective {
                fovy: Deg(self.fov_degrees),
                aspect: self.aspect(),
                near: self.near,
                far: self.far,
            },
        ])
    }
}

impl Default for HiddenLineView {
    fn default() -> Self {
        let config = ViewerConfig::default();
        Self {
            eye: config.eye,
            center: config.center,
            up: config.up,
            width: 1024,
            height: 1024,
            fov_degrees: config.fov_degrees,
            near: config.near,
            far: config.far,
            step: config.hidden_line_step,
            tolerance: SIMPLIFY_TOLERANCE,
        }
    }
}

/// Visible edges of `mesh` after `model`, returned in the mesh's coordinates.
///
/// Visibility rays are cast in the mesh's own space against its prebuilt
/// hierarchy, with the eye carried back through the inverse of `model`. A
/// singular `model` has no visible edges.
pub fn render_hidden_line(mesh: &Mesh, model: &Matrix4<f64>, view: &HiddenLineView) -> ContourSet {
    let Some(to_local) = model.invert() else {
        log::warn!("hidden-line pass skipped: model matrix is singular");
        return ContourSet::new();
    };
    let eye = transform_point(&to_local, view.eye);
    let clip_matrix = view.view_projection() * model;
    let clip = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));

    let visible = |p: Point3<f64>| -> bool {
        if !clip.contains(transform_point(&clip_matrix, p)) {
            return false;
        }
        let distance = p.distance(eye);
        let ray = Ray::new(p, eye - p);
        mesh.intersect_ray(&ray).map_or(true, |t| t >= distance)
    };

    let mut seen = HashSet::new();
    let mut contours = ContourSet::new();

    let edges = mesh.triangles().iter().flat_map(|t| t.edges());
    for (a, b) in edges {
        if !seen.insert(edge_key(a, b)) {
            continue;
        }

        // Steps are measured in the world, after `model`.
        let length = transform_point(model, a).distance(transform_point(model, b));
        let samples = ((length / view.step).ceil() as usize).max(1);
        let mut run = Contour::new();
        for i in 0..=samples {
            let t = i as f64 / samples as f64;
            let p = a + (b - a) * t;
            if visible(p) {
                run.push(p);
            } else {
                flush_run(&mut run, &mut contours);
            }
        }
        flush_run(&mut run, &mut contours);
    }

    log::trace!("hidden-line pass: {} edges, {} runs", seen.len(), contours.len());
    simplify_contours(contours, view.tolerance)
}

fn flush_run(run: &mut Contour, contours: &mut ContourSet) {
    if run.len() >= 2 {
        contours.push(std::mem::take(run));
    } else {
        run.clear();
    }
}

fn edge_key(a: Point3<f64>, b: Point3<f64>) -> [u64; 6] {
    let ka = [(a.x + 0.0).to_bits(), (a.y + 0.0).to_bits(), (a.z + 0.0).to_bits()];
    let kb = [(b.x + 0.0).to_bits(), (b.y + 0.0).to_bits(), (b.z + 0.0).to_bits()];
    let (lo, hi) = if ka <= kb { (ka, kb) } else { (kb, ka) };
    [lo[0], lo[1], lo[2], hi[0], hi[1], hi[2]]
}
