#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset configuration and file loaders.
//!
//! Each loader reads one input file, validates its header, and coerces every
//! row into a typed record. Rows that cannot be coerced are logged and
//! skipped; only structural problems (missing file, missing column, wrong
//! encoding) are returned as [`SourceError`].

pub mod accidents;
pub mod config;
pub mod crosses;
pub mod hospitals;
pub mod parsing;

use chrono::NaiveDateTime;
use traffic_map_accident_models::AccidentSeverity;

/// Errors that can occur while reading configuration or dataset files.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file missing or unreadable).
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// The file that failed to read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing failed at the structural level.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is missing from the header row.
    #[error("Missing required column {column:?} in {dataset}")]
    MissingColumn {
        /// Name of the dataset being loaded.
        dataset: &'static str,
        /// The column that was not found.
        column: String,
    },

    /// The configured text encoding label is not recognised.
    #[error("Unknown text encoding: {0}")]
    Encoding(String),

    /// The file contains no header row.
    #[error("{dataset} file contains no header row")]
    Empty {
        /// Name of the dataset being loaded.
        dataset: &'static str,
    },

    /// The TOML configuration is malformed.
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl SourceError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// An accident row after parsing and numeric coercion, before reprojection.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAccident {
    pub id: String,
    /// Longitude in the accident source CRS.
    pub longitude: f64,
    /// Latitude in the accident source CRS.
    pub latitude: f64,
    pub severity: AccidentSeverity,
    pub vehicles: u32,
    pub casualties: u32,
    pub weather: Option<String>,
    pub occurred_at: NaiveDateTime,
}

/// A hospital row after decoding and numeric coercion, before reprojection.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedHospital {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}
