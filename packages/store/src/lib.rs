#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory accident store for the traffic map.
//!
//! [`GeoFilterStore`] loads the accident and hospital datasets once,
//! reprojects them into the plot CRS, annotates every accident with its
//! closest hospital and then serves a filtered view plus per-severity counts
//! as the date and casualty bounds change. Every mutation recomputes both
//! and notifies registered [`ViewObserver`]s.

mod observer;
mod shared;
mod store;

pub use observer::{FilterChange, ViewObserver};
pub use shared::SharedGeoFilterStore;
pub use store::GeoFilterStore;

use traffic_map_accident_models::NearestStrategy;
use traffic_map_projection::Crs;
use traffic_map_source::SourceError;
use traffic_map_source::config::DatasetConfig;

/// Errors that can occur while building a [`GeoFilterStore`].
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A dataset file is missing, unreadable or structurally malformed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Every row of a dataset was dropped during cleaning.
    #[error("No valid {dataset} rows remain after cleaning")]
    NoValidRows {
        /// Name of the dataset that ended up empty.
        dataset: &'static str,
    },
}

/// Projection and filter settings used when building a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub accident_crs: Crs,
    pub hospital_crs: Crs,
    /// Planar CRS every position is reprojected into.
    pub target_crs: Crs,
    pub nearest_strategy: NearestStrategy,
    /// Index into the sorted timestamps used as the default start bound.
    pub default_start_offset: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            accident_crs: Crs::Wgs84,
            hospital_crs: Crs::Nad83,
            target_crs: Crs::WebMercator,
            nearest_strategy: NearestStrategy::default(),
            default_start_offset: 1,
        }
    }
}

impl From<&DatasetConfig> for StoreOptions {
    fn from(config: &DatasetConfig) -> Self {
        Self {
            accident_crs: config.accidents.crs,
            hospital_crs: config.hospitals.crs,
            target_crs: config.projection.target_crs,
            nearest_strategy: config.filters.nearest_strategy,
            default_start_offset: config.filters.default_start_offset,
        }
    }
}
