//! TOML dataset configuration.
//!
//! A [`DatasetConfig`] names every input file, the coordinate reference
//! system each file is published in, and the defaults the store and cross
//! selector start from. Relative paths are resolved against the directory
//! containing the configuration file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use traffic_map_accident_models::NearestStrategy;
use traffic_map_projection::Crs;

use crate::SourceError;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "traffic_map.toml";

/// Environment variable overriding [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_ENV_VAR: &str = "TRAFFIC_MAP_CONFIG";

/// Top-level configuration for the traffic map datasets.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub accidents: AccidentFileConfig,
    pub hospitals: HospitalFileConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub filters: FilterConfig,
    /// Cross-location dataset. Optional since the accident tool runs
    /// without it.
    #[serde(default)]
    pub crosses: Option<CrossFileConfig>,
}

/// Accident CSV location and CRS.
#[derive(Debug, Clone, Deserialize)]
pub struct AccidentFileConfig {
    pub path: PathBuf,
    #[serde(default = "default_accident_crs")]
    pub crs: Crs,
}

/// Hospital file location, CRS and text format.
#[derive(Debug, Clone, Deserialize)]
pub struct HospitalFileConfig {
    pub path: PathBuf,
    #[serde(default = "default_hospital_crs")]
    pub crs: Crs,
    #[serde(flatten)]
    pub format: HospitalFormat,
}

/// Text encoding and field separator of the hospital file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HospitalFormat {
    /// WHATWG encoding label (e.g. `"windows-1252"`).
    #[serde(default = "default_hospital_encoding")]
    pub encoding: String,
    /// Field separator as it reads after decoding.
    #[serde(default = "default_hospital_delimiter")]
    pub delimiter: String,
}

impl Default for HospitalFormat {
    fn default() -> Self {
        Self {
            encoding: default_hospital_encoding(),
            delimiter: default_hospital_delimiter(),
        }
    }
}

/// Planar CRS that every position is reprojected into.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default = "default_target_crs")]
    pub target_crs: Crs,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            target_crs: default_target_crs(),
        }
    }
}

/// Initial filter state and nearest-hospital search settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Index into the sorted timestamps used as the default start date.
    #[serde(default = "default_start_offset")]
    pub default_start_offset: usize,
    #[serde(default)]
    pub nearest_strategy: NearestStrategy,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            default_start_offset: default_start_offset(),
            nearest_strategy: NearestStrategy::default(),
        }
    }
}

/// Cross-location CSV and default query.
#[derive(Debug, Clone, Deserialize)]
pub struct CrossFileConfig {
    pub path: PathBuf,
    #[serde(default = "default_query_x")]
    pub query_x: f64,
    #[serde(default = "default_query_y")]
    pub query_y: f64,
    #[serde(default = "default_radius")]
    pub radius: f64,
}

const fn default_accident_crs() -> Crs {
    Crs::Wgs84
}

const fn default_hospital_crs() -> Crs {
    Crs::Nad83
}

const fn default_target_crs() -> Crs {
    Crs::WebMercator
}

fn default_hospital_encoding() -> String {
    "windows-1252".to_string()
}

fn default_hospital_delimiter() -> String {
    "\u{c2}\u{ac}".to_string()
}

const fn default_start_offset() -> usize {
    1
}

const fn default_query_x() -> f64 {
    80.0
}

const fn default_query_y() -> f64 {
    9.0
}

const fn default_radius() -> f64 {
    3.0
}

impl DatasetConfig {
    /// Parses a configuration from TOML text. Paths are left as written.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the TOML is malformed or a CRS
    /// identifier is unknown.
    pub fn from_toml_str(s: &str) -> Result<Self, SourceError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads a configuration file and resolves relative paths against its
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
        let mut config = Self::from_toml_str(&text)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        log::debug!("Loaded dataset configuration from {}", path.display());
        Ok(config)
    }

    /// Resolves the config path from an explicit argument, the
    /// [`CONFIG_ENV_VAR`] environment variable, or [`DEFAULT_CONFIG_PATH`].
    #[must_use]
    pub fn locate(explicit: Option<&Path>) -> PathBuf {
        explicit.map_or_else(
            || {
                std::env::var(CONFIG_ENV_VAR)
                    .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
            },
            Path::to_path_buf,
        )
    }

    /// Joins every relative dataset path onto `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        resolve(&mut self.accidents.path, base);
        resolve(&mut self.hospitals.path, base);
        if let Some(crosses) = &mut self.crosses {
            resolve(&mut crosses.path, base);
        }
    }
}

fn resolve(path: &mut PathBuf, base: &Path) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}
