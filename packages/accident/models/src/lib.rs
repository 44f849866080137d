#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Accident severity taxonomy and the record types shared across the
//! traffic map workspace.
//!
//! Severity codes, their display colors and verbal labels form a fixed
//! mapping defined here once. Every other crate derives colors and labels
//! through [`AccidentSeverity`] instead of keeping its own lookup tables.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity of a road accident, from 1 (severe) to 3 (minor).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AccidentSeverity {
    /// Code 1: fatal or serious injuries
    Severe = 1,
    /// Code 2: serious but non-fatal
    Medium = 2,
    /// Code 3: slight injuries
    Minor = 3,
}

impl AccidentSeverity {
    /// Returns the numeric severity code.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a severity from its numeric code.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-3.
    pub const fn from_value(value: u8) -> Result<Self, InvalidSeverityError> {
        match value {
            1 => Ok(Self::Severe),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Minor),
            _ => Err(InvalidSeverityError { value }),
        }
    }

    /// Marker color used when plotting accidents of this severity.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Severe => "darkred",
            Self::Medium => "saddlebrown",
            Self::Minor => "orange",
        }
    }

    /// Verbal label shown in tooltips and the severity aggregate.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Severe => "Severe",
            Self::Medium => "Medium",
            Self::Minor => "Minor",
        }
    }

    /// Returns all variants of this enum, in code order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Severe, Self::Medium, Self::Minor]
    }
}

/// Error returned when attempting to create an [`AccidentSeverity`] from an
/// invalid numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSeverityError {
    /// The invalid severity value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidSeverityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid severity value {}: expected 1-3", self.value)
    }
}

impl std::error::Error for InvalidSeverityError {}

/// How the closest hospital to each accident is searched for.
///
/// Both strategies select the same hospital for every accident.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NearestStrategy {
    /// Full accident × hospital distance matrix.
    BruteForce,
    /// R-tree window search over hospital positions.
    #[default]
    Indexed,
}

/// Nearest hospital to an accident, computed once at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosestHospital {
    /// Row index of the hospital in the hospital table.
    pub index: usize,
    /// Organisation name of the hospital.
    pub name: String,
    /// Planar distance in kilometres, rounded to 2 decimals.
    pub distance_km: f64,
}

/// A fully loaded accident: parsed, reprojected and annotated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentRecord {
    /// Accident index from the source file.
    pub id: String,
    /// Longitude in the source CRS.
    pub longitude: f64,
    /// Latitude in the source CRS.
    pub latitude: f64,
    /// Projected x in the plot CRS.
    pub x: f64,
    /// Projected y in the plot CRS.
    pub y: f64,
    pub severity: AccidentSeverity,
    pub vehicles: u32,
    pub casualties: u32,
    /// Weather condition code, when the source provides one.
    pub weather: Option<String>,
    /// Local wall-clock time of the accident.
    pub occurred_at: NaiveDateTime,
    /// Casualty count scaled by three, used as the marker radius.
    pub casualty_weight: u32,
    pub closest_hospital: ClosestHospital,
}

/// A hospital with its projected position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalRecord {
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
    pub x: f64,
    pub y: f64,
}

/// Number of filtered accidents with a given severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCount {
    pub severity: AccidentSeverity,
    /// Verbal severity label.
    #[serde(rename = "Accident_Severity")]
    pub label: String,
    #[serde(rename = "counts")]
    pub count: u64,
    pub color: String,
}

impl SeverityCount {
    #[must_use]
    pub fn new(severity: AccidentSeverity, count: u64) -> Self {
        Self {
            severity,
            label: severity.label().to_string(),
            count,
            color: severity.color().to_string(),
        }
    }
}

/// One accident row as consumed by the plotting layer.
///
/// Field names match the columns the dashboard plotting layer reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccidentView {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "Accident_Severity")]
    pub severity: u8,
    #[serde(rename = "Number_of_Vehicles")]
    pub vehicles: u32,
    #[serde(rename = "Number_of_Casualties")]
    pub casualties: u32,
    pub datetime: NaiveDateTime,
    #[serde(rename = "Casualties3")]
    pub casualty_weight: u32,
    pub color: String,
    #[serde(rename = "Verbal_severity")]
    pub verbal_severity: String,
    pub closest_hospital_name: String,
    pub closest_hospital_distance: f64,
}

impl From<&AccidentRecord> for AccidentView {
    fn from(record: &AccidentRecord) -> Self {
        Self {
            x: record.x,
            y: record.y,
            severity: record.severity.value(),
            vehicles: record.vehicles,
            casualties: record.casualties,
            datetime: record.occurred_at,
            casualty_weight: record.casualty_weight,
            color: record.severity.color().to_string(),
            verbal_severity: record.severity.label().to_string(),
            closest_hospital_name: record.closest_hospital.name.clone(),
            closest_hospital_distance: record.closest_hospital.distance_km,
        }
    }
}

/// One hospital row as consumed by the plotting layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalView {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "OrganisationName")]
    pub name: String,
}

impl From<&HospitalRecord> for HospitalView {
    fn from(record: &HospitalRecord) -> Self {
        Self {
            x: record.x,
            y: record.y,
            name: record.name.clone(),
        }
    }
}
