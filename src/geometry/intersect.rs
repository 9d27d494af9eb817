//! Plane / mesh intersection
//!
//! Each triangle crossing the plane yields one segment; segments that share an
//! endpoint are then chained into open polylines. A loop that closes repeats
//! its first point at the end, since contours are never closed implicitly.

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

use cgmath::{InnerSpace, Point3};

use super::{mesh::Mesh, mesh::Triangle, Contour, ContourSet, Plane};

const PARALLEL_EPSILON: f64 = 1e-9;

type Segment = (Point3<f64>, Point3<f64>);

/// Where the segment `a..b` crosses `plane`, if it does.
///
/// Segments parallel to the plane (including ones lying in it) never
/// intersect. The endpoints are put in a canonical order first so the shared
/// edge of two neighbouring triangles yields the bit-identical point.
pub fn intersect_segment(plane: &Plane, a: Point3<f64>, b: Point3<f64>) -> Option<Point3<f64>> {
    let (a, b) = if lexicographic(&b, &a) == Ordering::Less {
        (b, a)
    } else {
        (a, b)
    };

    let u = b - a;
    let d = plane.normal.dot(u);
    if d.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = -plane.normal.dot(a - plane.point) / d;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(a + u * t)
}

/// The segment where `triangle` crosses `plane`, if it has non-zero length.
pub fn intersect_triangle(plane: &Plane, triangle: &Triangle) -> Option<Segment> {
    let hits: Vec<Point3<f64>> = triangle
        .edges()
        .iter()
        .filter_map(|&(a, b)| intersect_segment(plane, a, b))
        .collect();

    // A vertex on the plane is reported by both of its edges.
    let first = *hits.first()?;
    let second = hits.iter().copied().find(|p| *p != first)?;
    Some((first, second))
}

pub fn intersect_mesh(plane: &Plane, mesh: &Mesh) -> ContourSet {
    let segments = mesh
        .triangles()
        .iter()
        .filter_map(|t| intersect_triangle(plane, t))
        .collect();
    chain_segments(dedup_segments(segments))
}

/// Drops repeated segments regardless of direction. An edge lying in the
/// plane is reported once by each triangle that shares it.
pub fn dedup_segments(segments: Vec<Segment>) -> Vec<Segment> {
    let mut seen = HashSet::new();
    segments
        .into_iter()
        .filter(|(a, b)| {
            let (ka, kb) = (point_key(a), point_key(b));
            seen.insert(if ka <= kb { (ka, kb) } else { (kb, ka) })
        })
        .collect()
}

/// Joins segments that share exact endpoints into polylines.
pub fn chain_segments(segments: Vec<Segment>) -> ContourSet {
    let mut by_endpoint: HashMap<[u64; 3], Vec<usize>> = HashMap::new();
    for (i, (a, b)) in segments.iter().enumerate() {
        by_endpoint.entry(point_key(a)).or_default().push(i);
        by_endpoint.entry(point_key(b)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut contours = ContourSet::new();

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let (a, b) = segments[start];

        let mut forward = vec![a, b];
        extend_chain(&mut forward, &segments, &by_endpoint, &mut used);

        let mut backward = vec![a];
        extend_chain(&mut backward, &segments, &by_endpoint, &mut used);

        let mut contour: Contour = backward.into_iter().skip(1).rev().collect();
        contour.extend(forward);
        contours.push(contour);
    }

    contours
}

fn extend_chain(
    chain: &mut Contour,
    segments: &[Segment],
    by_endpoint: &HashMap<[u64; 3], Vec<usize>>,
    used: &mut [bool],
) {
    while let Some(&tail) = chain.last() {
        let next = by_endpoint
            .get(&point_key(&tail))
            .and_then(|candidates| candidates.iter().copied().find(|&i| !used[i]));
        let Some(i) = next else {
            break;
        };
        used[i] = true;
        let (a, b) = segments[i];
        chain.push(if point_key(&a) == point_key(&tail) { b } else { a });
    }
}

fn point_key(p: &Point3<f64>) -> [u64; 3] {
    // Adding 0.0 folds -0.0 into +0.0.
    [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), (p.z + 0.0).to_bits()]
}

fn lexicographic(a: &Point3<f64>, b: &Point3<f64>) -> Ordering {
    a.x.total_cmp(&b.x)
        .then(a.y.total_cmp(&b.y))
        .then(a.z.total_cmp(&b.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::primitives::generate_cube;

    fn p(x: f64, y: f64, z: f64) -> Point3<f64> {
        Point3::new(x, y, z)
    }

    #[test]
    fn test_segment_crossing() {
        let plane = Plane::horizontal(0.25);
        let hit = intersect_segment(&plane, p(0.0, 0.0, 0.0), p(0.0, 1.0, 2.0)).unwrap();
        assert_eq!(hit, p(0.0, 0.25, 0.5));
        assert!(intersect_segment(&plane, p(0.0, 0.5, 0.0), p(0.0, 1.0, 0.0)).is_none());
    }

    #[test]
    fn test_segment_order_does_not_change_hit() {
        let plane = Plane::horizontal(0.3);
        let a = p(0.1, -0.7, 0.33);
        let b = p(-0.4, 0.9, 0.01);
        assert_eq!(
            intersect_segment(&plane, a, b),
            intersect_segment(&plane, b, a)
        );
    }

    #[test]
    fn test_in_plane_triangle_yields_nothing() {
        let plane = Plane::horizontal(0.0);
        let tri = Triangle::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 0.0, 1.0));
        assert!(intersect_triangle(&plane, &tri).is_none());
    }

    #[test]
    fn test_vertex_touching_plane_is_degenerate() {
        let plane = Plane::horizontal(1.0);
        let tri = Triangle::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0));
        assert!(intersect_triangle(&plane, &tri).is_none());
    }

    #[test]
    fn test_cube_slice_is_one_closed_loop() {
        let cube = generate_cube();
        let contours = intersect_mesh(&Plane::horizontal(0.1), &cube);

        assert_eq!(contours.len(), 1);
        let contour = &contours[0];
        // Eight side triangles, eight segments, nine points with the loop closed.
        assert_eq!(contour.len(), 9);
        assert_eq!(contour.first(), contour.last());
        for point in contour {
            assert!((point.y - 0.1).abs() < 1e-12);
            assert!((point.x.abs() - 0.5).abs() < 1e-12 || (point.z.abs() - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_in_plane_edge_between_two_triangles_is_drawn_once() {
        // The edge (0,0,0)-(1,0,0) lies in y = 0; one triangle rises above
        // it and the other drops below, so each reports the same segment.
        let plane = Plane::horizontal(0.0);
        let above = Triangle::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.5, 1.0, 0.0));
        let below = Triangle::new(p(1.0, 0.0, 0.0), p(0.0, 0.0, 0.0), p(0.5, -1.0, 0.0));
        assert!(intersect_triangle(&plane, &above).is_some());
        assert!(intersect_triangle(&plane, &below).is_some());

        let mesh = Mesh::from_triangles(vec![above, below]);
        let contours = intersect_mesh(&plane, &mesh);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 2);
    }

    #[test]
    fn test_dedup_ignores_direction() {
        let segments = dedup_segments(vec![
            (p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)),
            (p(1.0, 0.0, 0.0), p(0.0, 0.0, 0.0)),
            (p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)),
        ]);
        assert_eq!(
            segments,
            vec![
                (p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)),
                (p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_plane_outside_mesh_is_empty() {
        let cube = generate_cube();
        assert!(intersect_mesh(&Plane::horizontal(0.75), &cube).is_empty());
        assert!(intersect_mesh(&Plane::horizontal(-1.0), &cube).is_empty());
    }

    #[test]
    fn test_chain_keeps_separate_pieces_apart() {
        let contours = chain_segments(vec![
            (p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)),
            (p(5.0, 0.0, 0.0), p(6.0, 0.0, 0.0)),
            (p(2.0, 0.0, 0.0), p(1.0, 0.0, 0.0)),
        ]);
        assert_eq!(contours.len(), 2);
        assert_eq!(
            contours[0],
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)]
        );
        assert_eq!(contours[1], vec![p(5.0, 0.0, 0.0), p(6.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_chain_extends_backwards() {
        let contours = chain_segments(vec![
            (p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)),
            (p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)),
        ]);
        assert_eq!(
            contours,
            vec![vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)]]
        );
    }
}
