//! Closest-hospital search.
//!
//! Distances are planar euclidean metres converted to kilometres and
//! rounded to 2 decimals *before* the argmin, so two hospitals whose
//! distances round to the same value tie. Ties go to the lowest hospital
//! index. The brute-force scan and the R-tree search agree on every input.

use geo::Point;
use rstar::{AABB, RTree};
use rstar::primitives::GeomWithData;
use traffic_map_accident_models::NearestStrategy;

/// Half of the 0.01 km rounding step.
const HALF_STEP_KM: f64 = 0.005;

/// The selected hospital for one query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// Index into the hospital slice the finder was built from.
    pub index: usize,
    /// Rounded distance in kilometres.
    pub distance_km: f64,
}

/// Unrounded planar distance between two projected points, in kilometres.
#[must_use]
pub fn raw_distance_km(a: Point<f64>, b: Point<f64>) -> f64 {
    let dx = a.x() - b.x();
    let dy = a.y() - b.y();
    dx.mul_add(dx, dy * dy).sqrt() / 1000.0
}

/// Rounds kilometres to 2 decimals, half to even.
#[must_use]
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round_ties_even() / 100.0
}

/// Planar distance between two projected points, in kilometres rounded to
/// 2 decimals.
#[must_use]
pub fn distance_km(a: Point<f64>, b: Point<f64>) -> f64 {
    round_km(raw_distance_km(a, b))
}

/// Scans every hospital. Returns `None` if `hospitals` is empty.
#[must_use]
pub fn nearest_brute_force(point: Point<f64>, hospitals: &[Point<f64>]) -> Option<Nearest> {
    let mut best: Option<Nearest> = None;
    for (index, hospital) in hospitals.iter().enumerate() {
        let distance_km = distance_km(point, *hospital);
        match best {
            Some(b) if distance_km >= b.distance_km => {}
            _ => best = Some(Nearest { index, distance_km }),
        }
    }
    best
}

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// R-tree over hospital positions.
pub struct HospitalIndex {
    tree: RTree<IndexedPoint>,
    /// Half-width of the first search window.
    initial_reach: f64,
}

impl HospitalIndex {
    #[must_use]
    pub fn new(hospitals: &[Point<f64>]) -> Self {
        let entries: Vec<IndexedPoint> = hospitals
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new([p.x(), p.y()], i))
            .collect();

        let (min_x, max_x, min_y, max_y) = hospitals.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(min_x, max_x, min_y, max_y), p| {
                (min_x.min(p.x()), max_x.max(p.x()), min_y.min(p.y()), max_y.max(p.y()))
            },
        );
        #[allow(clippy::cast_precision_loss)]
        let spread = ((max_x - min_x).max(max_y - min_y) / (hospitals.len() as f64).sqrt())
            .max(1.0);

        Self {
            tree: RTree::bulk_load(entries),
            initial_reach: if spread.is_finite() { spread } else { 1.0 },
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Searches a square window around `point`, doubling it until no
    /// hospital outside the window could round to the best distance found.
    /// Returns `None` if the index is empty.
    #[must_use]
    pub fn nearest(&self, point: Point<f64>) -> Option<Nearest> {
        if self.is_empty() || !point.x().is_finite() || !point.y().is_finite() {
            return None;
        }

        let mut reach = self.initial_reach;
        loop {
            let window = AABB::from_corners(
                [point.x() - reach, point.y() - reach],
                [point.x() + reach, point.y() + reach],
            );

            let mut seen = 0usize;
            let mut best: Option<Nearest> = None;
            for entry in self.tree.locate_in_envelope_intersecting(&window) {
                seen += 1;
                let [hx, hy] = *entry.geom();
                let candidate = Nearest {
                    index: entry.data,
                    distance_km: distance_km(point, Point::new(hx, hy)),
                };
                best = match best {
                    Some(b) if b.is_closer_than(&candidate) => Some(b),
                    _ => Some(candidate),
                };
            }

            // Anything outside the window is more than `reach` metres away.
            let settled = best.is_some_and(|b| {
                reach / 1000.0 > b.distance_km + HALF_STEP_KM + f64::EPSILON * 16.0
            });
            if settled || seen == self.tree.size() {
                return best;
            }
            reach *= 2.0;
        }
    }
}

impl Nearest {
    /// Whether `self` beats `other`: smaller rounded distance, then lower
    /// index.
    fn is_closer_than(&self, other: &Self) -> bool {
        match self.distance_km.total_cmp(&other.distance_km) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Equal => self.index < other.index,
            std::cmp::Ordering::Greater => false,
        }
    }
}

/// Closest-hospital search using the configured [`NearestStrategy`].
pub enum NearestHospitalFinder {
    BruteForce(Vec<Point<f64>>),
    Indexed(HospitalIndex),
}

impl NearestHospitalFinder {
    #[must_use]
    pub fn new(strategy: NearestStrategy, hospitals: &[Point<f64>]) -> Self {
        log::debug!(
            "Building {strategy} closest-hospital finder over {} hospitals",
            hospitals.len()
        );
        match strategy {
            NearestStrategy::BruteForce => Self::BruteForce(hospitals.to_vec()),
            NearestStrategy::Indexed => Self::Indexed(HospitalIndex::new(hospitals)),
        }
    }

    #[must_use]
    pub fn nearest(&self, point: Point<f64>) -> Option<Nearest> {
        match self {
            Self::BruteForce(hospitals) => nearest_brute_force(point, hospitals),
            Self::Indexed(index) => index.nearest(point),
        }
    }
}
