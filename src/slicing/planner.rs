//! Horizontal cutting planes

use crate::geometry::Plane;

/// One cutting plane together with its place in the stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlicePlane {
    pub index: usize,
    /// Normalized height in `[-1, 1)`.
    pub offset: f64,
    pub plane: Plane,
}

/// Evenly spaced horizontal planes over `[-1, 1)`.
///
/// Plane `i` of `N` sits at `y = i / N * 2 - 1`. A count of zero is allowed and
/// yields no planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlicePlanner {
    count: usize,
}

impl SlicePlanner {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn offset(&self, index: usize) -> f64 {
        index as f64 / self.count as f64 * 2.0 - 1.0
    }

    /// Planes in increasing height order.
    pub fn planes(&self) -> Vec<SlicePlane> {
        (0..self.count)
            .map(|index| {
                let offset = self.offset(index);
                SlicePlane {
                    index,
                    offset,
                    plane: Plane::horizontal(offset),
                }
            })
            .collect()
    }
}
