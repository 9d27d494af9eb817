//! Bounding volume hierarchy over a mesh's triangles
//!
//! Built once per mesh. Nodes split the triangle set at the median centroid
//! along the longest axis until a leaf holds at most `max_leaf_size`
//! triangles. Ray queries walk the tree and skip subtrees whose box starts
//! beyond the nearest hit found so far.

use cgmath::Point3;

use super::{
    mesh::Triangle,
    ray::{Aabb, Ray},
};

/// Triangles per leaf used by [`crate::geometry::Mesh`].
pub const DEFAULT_LEAF_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq)]
enum BvhNode {
    Leaf {
        bounds: Aabb,
        triangles: Vec<u32>,
    },
    Internal {
        bounds: Aabb,
        left: Box<BvhNode>,
        right: Box<BvhNode>,
    },
}

impl BvhNode {
    fn bounds(&self) -> &Aabb {
        match self {
            BvhNode::Leaf { bounds, .. } | BvhNode::Internal { bounds, .. } => bounds,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    index: u32,
    bounds: Aabb,
    centroid: Point3<f64>,
}

/// Hierarchy of triangle indices; queries take the triangle slice it was
/// built from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bvh {
    root: Option<BvhNode>,
}

impl Bvh {
    pub fn build(triangles: &[Triangle], max_leaf_size: usize) -> Self {
        let mut entries: Vec<Entry> = triangles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let bounds = t.bounds();
                Entry {
                    index: i as u32,
                    bounds,
                    centroid: bounds.center(),
                }
            })
            .collect();

        if entries.is_empty() {
            return Self::default();
        }
        Self {
            root: Some(build_node(&mut entries, max_leaf_size.max(1))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Nearest hit distance of `ray` against `triangles`.
    pub fn intersect_ray(&self, triangles: &[Triangle], ray: &Ray) -> Option<f64> {
        let mut nearest: Option<f64> = None;
        let mut stack: Vec<&BvhNode> = self.root.iter().collect();

        while let Some(node) = stack.pop() {
            let Some(entry) = node.bounds().ray_entry(ray) else {
                continue;
            };
            if nearest.is_some_and(|t| entry > t) {
                continue;
            }

            match node {
                BvhNode::Leaf { triangles: ids, .. } => {
                    for &i in ids {
                        let Some(t) = triangles.get(i as usize).and_then(|tri| tri.intersect_ray(ray))
                        else {
                            continue;
                        };
                        nearest = Some(nearest.map_or(t, |n| n.min(t)));
                    }
                }
                BvhNode::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        nearest
    }
}

fn build_node(entries: &mut [Entry], max_leaf_size: usize) -> BvhNode {
    let bounds = entries
        .iter()
        .skip(1)
        .fold(entries[0].bounds, |acc, e| acc.union(&e.bounds));

    let centroids = Aabb::from_points(entries.iter().map(|e| e.centroid));
    let split_axis = centroids
        .filter(|c| c.size().x.max(c.size().y).max(c.size().z) > 0.0)
        .map(|c| c.longest_axis());

    let axis = match split_axis {
        Some(axis) if entries.len() > max_leaf_size => axis,
        // Small enough, or every centroid coincides.
        _ => {
            return BvhNode::Leaf {
                bounds,
                triangles: entries.iter().map(|e| e.index).collect(),
            }
        }
    };

    entries.sort_by(|a, b| a.centroid[axis].total_cmp(&b.centroid[axis]));
    let (left, right) = entries.split_at_mut(entries.len() / 2);

    BvhNode::Internal {
        bounds,
        left: Box::new(build_node(left, max_leaf_size)),
        right: Box::new(build_node(right, max_leaf_size)),
    }
}
