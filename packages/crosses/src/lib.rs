#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Where do teams cross from a given spot?
//!
//! [`CrossSelector`] indexes the start position of every cross once, then for
//! any query point returns the crosses that started within the radius along
//! with a least-squares line through their end positions.

pub mod regression;

use std::path::Path;

use traffic_map_crosses_models::{CrossRecord, CrossSelection};
use traffic_map_source::SourceError;
use traffic_map_source::crosses::load_crosses;
use traffic_map_spatial::SpatialProximityIndex;

/// Query point used when none is given.
pub const DEFAULT_QUERY: (f64, f64) = (80.0, 9.0);

/// Search radius used when none is given, in pitch units.
pub const DEFAULT_RADIUS: f64 = 3.0;

/// Crosses indexed by start position.
pub struct CrossSelector {
    crosses: Vec<CrossRecord>,
    index: SpatialProximityIndex,
}

impl CrossSelector {
    #[must_use]
    pub fn new(crosses: Vec<CrossRecord>) -> Self {
        let index = SpatialProximityIndex::new(crosses.iter().map(|c| (c.x, c.y)));
        log::debug!("Indexed {} cross start positions", index.len());
        Self { crosses, index }
    }

    /// Loads the crosses CSV at `path` and indexes it.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or lacks a
    /// required column.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        Ok(Self::new(load_crosses(path)?))
    }

    #[must_use]
    pub fn crosses(&self) -> &[CrossRecord] {
        &self.crosses
    }

    /// Crosses whose start lies within `radius` of `point`, in dataset
    /// order, plus a fit of end y against end x when one exists.
    #[must_use]
    pub fn select(&self, point: (f64, f64), radius: f64) -> CrossSelection {
        let hits = self.index.query(point, radius);

        let mut cross_ids = Vec::with_capacity(hits.len());
        let mut cx = Vec::with_capacity(hits.len());
        let mut cy = Vec::with_capacity(hits.len());
        for cross in hits.iter().map(|&i| &self.crosses[i]) {
            cross_ids.push(cross.cross_id.clone());
            cx.push(cross.pass_end_x);
            cy.push(cross.pass_end_y);
        }

        let regression = regression::fit_line(&cx, &cy);
        if regression.is_none() && !cx.is_empty() {
            log::debug!(
                "No regression for {} crosses near ({}, {})",
                cx.len(),
                point.0,
                point.1
            );
        }

        CrossSelection {
            origin: point,
            radius,
            cross_ids,
            cx,
            cy,
            regression,
        }
    }

    /// [`Self::select`] around [`DEFAULT_QUERY`] with [`DEFAULT_RADIUS`].
    #[must_use]
    pub fn select_default(&self) -> CrossSelection {
        self.select(DEFAULT_QUERY, DEFAULT_RADIUS)
    }
}
