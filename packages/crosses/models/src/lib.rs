#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cross-pass record, selection and regression result types.
//!
//! Coordinates are in the pitch's native 0-100 units and are never
//! reprojected.

use serde::{Deserialize, Serialize};

/// A single cross: where the pass started and where it ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossRecord {
    pub cross_id: String,
    /// Start x.
    pub x: f64,
    /// Start y.
    pub y: f64,
    pub pass_end_x: f64,
    pub pass_end_y: f64,
}

/// Least-squares fit of end y against end x over a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionLine {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination of the fit on the selected ends.
    pub r2: f64,
    /// Sampled points of the best-fit line.
    pub line: Vec<(f64, f64)>,
}

impl RegressionLine {
    /// Annotation text for the fit, e.g. `R^2 = 0.421337`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("R^2 = {:.6}", self.r2)
    }

    /// Predicted end y for an end x.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// Crosses whose start lies within the query radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSelection {
    /// Query point the selection was made around.
    pub origin: (f64, f64),
    pub radius: f64,
    /// Ids of the selected crosses, in dataset order.
    pub cross_ids: Vec<String>,
    /// End x of each selected cross.
    pub cx: Vec<f64>,
    /// End y of each selected cross.
    pub cy: Vec<f64>,
    /// `None` when the selection is too small or degenerate to fit.
    pub regression: Option<RegressionLine>,
}

impl CrossSelection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cross_ids.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cross_ids.len()
    }
}
