//! Polyline stroking
//!
//! Each segment of a [`ScreenPolyline`] becomes one quad (two triangles)
//! `stroke_width` pixels wide. Segments are extended by half the width at both
//! ends so consecutive quads overlap at the joints.

use super::vertex::StrokeVertex;
use crate::slicing::ScreenPolyline;

const VERTICES_PER_SEGMENT: usize = 6;

/// Triangle-list vertices for `polylines`, in draw order.
///
/// Zero-length segments and single-point paths produce nothing.
pub fn tessellate(polylines: &[ScreenPolyline]) -> Vec<StrokeVertex> {
    let segments: usize = polylines
        .iter()
        .map(|p| p.points.len().saturating_sub(1))
        .sum();
    let mut vertices = Vec::with_capacity(segments * VERTICES_PER_SEGMENT);

    for polyline in polylines {
        let color = polyline.color.to_array();
        let half = polyline.stroke_width * 0.5;
        for pair in polyline.points.windows(2) {
            push_segment(&mut vertices, pair[0], pair[1], half, color);
        }
    }

    vertices
}

fn push_segment(out: &mut Vec<StrokeVertex>, a: [f32; 2], b: [f32; 2], half: f32, color: [f32; 4]) {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return;
    }

    // Unit direction scaled to half the width, and its perpendicular.
    let (tx, ty) = (dx / len * half, dy / len * half);
    let (nx, ny) = (-ty, tx);

    let start = [a[0] - tx, a[1] - ty];
    let end = [b[0] + tx, b[1] + ty];

    let v = |x: f32, y: f32| StrokeVertex {
        position: [x, y],
        color,
    };
    let q0 = v(start[0] + nx, start[1] + ny);
    let q1 = v(start[0] - nx, start[1] - ny);
    let q2 = v(end[0] + nx, end[1] + ny);
    let q3 = v(end[0] - nx, end[1] - ny);

    out.extend_from_slice(&[q0, q1, q2, q2, q1, q3]);
}
