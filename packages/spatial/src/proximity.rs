//! Fixed-radius proximity queries over a static point set.
//!
//! Coordinates and radius are in the caller's units; nothing is scaled or
//! reprojected.

use std::collections::BTreeSet;

use rstar::{AABB, RTree};
use rstar::primitives::GeomWithData;

/// R-tree over a fixed set of 2-D points, answering "which points lie within
/// `radius` of here".
pub struct SpatialProximityIndex {
    tree: RTree<GeomWithData<[f64; 2], usize>>,
    points: Vec<[f64; 2]>,
}

impl SpatialProximityIndex {
    /// Builds the index. Point `i` of the input is reported as index `i`.
    #[must_use]
    pub fn new(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let points: Vec<[f64; 2]> = points.into_iter().map(|(x, y)| [x, y]).collect();
        let entries = points
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new(*p, i))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
            points,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the indices of every point whose euclidean distance to
    /// `point` is at most `radius`. An empty set is a normal result; a
    /// negative or non-finite radius always yields one.
    #[must_use]
    pub fn query(&self, point: (f64, f64), radius: f64) -> BTreeSet<usize> {
        if !radius.is_finite() || radius < 0.0 || !point.0.is_finite() || !point.1.is_finite() {
            return BTreeSet::new();
        }
        let window = AABB::from_corners(
            [point.0 - radius, point.1 - radius],
            [point.0 + radius, point.1 + radius],
        );
        self.tree
            .locate_in_envelope_intersecting(&window)
            .filter(|entry| within(*entry.geom(), point, radius))
            .map(|entry| entry.data)
            .collect()
    }

    /// Linear scan with the same semantics as [`Self::query`].
    #[must_use]
    pub fn query_brute_force(&self, point: (f64, f64), radius: f64) -> BTreeSet<usize> {
        if !radius.is_finite() || radius < 0.0 {
            return BTreeSet::new();
        }
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| within(**p, point, radius))
            .map(|(i, _)| i)
            .collect()
    }

    /// Position of point `index`, if it exists.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<(f64, f64)> {
        self.points.get(index).map(|p| (p[0], p[1]))
    }
}

#[allow(clippy::suboptimal_flops)]
fn within(p: [f64; 2], centre: (f64, f64), radius: f64) -> bool {
    let dx = p[0] - centre.0;
    let dy = p[1] - centre.1;
    dx * dx + dy * dy <= radius * radius
}
