//! Ramer–Douglas–Peucker polyline simplification in 3D

use cgmath::{InnerSpace, MetricSpace, Point3};

use super::{Contour, ContourSet};

/// Simplifies every contour of `contours` with the same tolerance.
pub fn simplify_contours(contours: ContourSet, tolerance: f64) -> ContourSet {
    contours
        .into_iter()
        .map(|contour| simplify_contour(&contour, tolerance))
        .collect()
}

/// Drops interior points closer than `tolerance` to the chord they sit on.
///
/// The first and last points are always kept; contours of fewer than three
/// points are returned unchanged.
pub fn simplify_contour(points: &[Point3<f64>], tolerance: f64) -> Contour {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut stack = vec![(0, points.len() - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let (index, distance) = (start + 1..end)
            .map(|i| (i, segment_distance(points[i], points[start], points[end])))
            .fold((start, 0.0), |best, candidate| {
                if candidate.1 > best.1 {
                    candidate
                } else {
                    best
                }
            });

        if distance > tolerance {
            keep[index] = true;
            stack.push((start, index));
            stack.push((index, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, kept)| kept.then_some(*p))
        .collect()
}

/// Distance from `p` to the segment `a..b`.
pub fn segment_distance(p: Point3<f64>, a: Point3<f64>, b: Point3<f64>) -> f64 {
    let ab = b - a;
    let len2 = ab.magnitude2();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
