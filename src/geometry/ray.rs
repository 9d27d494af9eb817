//! Rays and bounding boxes for visibility testing

use cgmath::{InnerSpace, Point3, Vector3};

/// A ray with a normalized direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Bounds of `points`, or `None` when there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f64>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first, first);
        for p in iter {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.min.z = bounds.min.z.min(p.z);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
            bounds.max.z = bounds.max.z.max(p.z);
        }
        Some(bounds)
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f64> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    pub fn contains(&self, p: Point3<f64>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Smallest box holding both `self` and `other`.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(
            Point3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            Point3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        )
    }

    /// 0, 1 or 2 for x, y or z.
    pub fn longest_axis(&self) -> usize {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            0
        } else if size.y >= size.z {
            1
        } else {
            2
        }
    }

    /// Slab test. Returns the entry distance (or the exit distance when the
    /// origin is inside), or `None` on a miss.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f64> {
        let (t_near, t_far) = self.slab(ray)?;
        Some(if t_near >= 0.0 { t_near } else { t_far })
    }

    /// Distance at which `ray` enters the box; 0 when the origin is inside.
    pub fn ray_entry(&self, ray: &Ray) -> Option<f64> {
        self.slab(ray).map(|(t_near, _)| t_near.max(0.0))
    }

    fn slab(&self, ray: &Ray) -> Option<(f64, f64)> {
        let inv = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t0 = Vector3::new(
            (self.min.x - ray.origin.x) * inv.x,
            (self.min.y - ray.origin.y) * inv.y,
            (self.min.z - ray.origin.z) * inv.z,
        );
        let t1 = Vector3::new(
            (self.max.x - ray.origin.x) * inv.x,
            (self.max.y - ray.origin.y) * inv.y,
            (self.max.z - ray.origin.z) * inv.z,
        );

        let t_near = t0.x.min(t1.x).max(t0.y.min(t1.y)).max(t0.z.min(t1.z));
        let t_far = t0.x.max(t1.x).min(t0.y.max(t1.y)).min(t0.z.max(t1.z));

        (t_near <= t_far && t_far >= 0.0).then_some((t_near, t_far))
    }
}
