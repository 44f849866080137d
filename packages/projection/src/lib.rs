#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate reference systems and point reprojection.
//!
//! Supports the geographic systems the source datasets are published in
//! (`EPSG:4326`, `EPSG:4269`) and the planar systems the dashboards plot in
//! (`EPSG:3857` Web Mercator, `EPSG:4087` world equidistant cylindrical).
//! Inputs may arrive as text straight out of a CSV cell; [`coerce`] turns
//! them into finite floats or reports why it could not.

use std::fmt;
use std::str::FromStr;

use geo::Point;
use serde::{Deserialize, Serialize};

/// Semi-major axis of the WGS84 ellipsoid, used as the sphere radius by the
/// spherical planar projections.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Errors that can occur while coercing or reprojecting coordinates.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    /// The CRS identifier is not one this crate knows.
    #[error("Unknown CRS identifier: {0}")]
    UnknownCrs(String),

    /// A coordinate could not be parsed as a finite number.
    #[error("Cannot coerce {value:?} to a coordinate")]
    Coercion {
        /// The raw text that failed to parse.
        value: String,
    },

    /// The point lies outside the domain of the projection.
    #[error("Point ({x}, {y}) is outside the domain of {crs}")]
    OutOfDomain {
        /// Input x (longitude for geographic systems).
        x: f64,
        /// Input y (latitude for geographic systems).
        y: f64,
        /// The CRS whose domain was violated.
        crs: Crs,
    },
}

/// A coordinate reference system identified by its EPSG code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Crs {
    /// `EPSG:4326`, WGS84 longitude/latitude in degrees.
    Wgs84,
    /// `EPSG:4269`, NAD83 longitude/latitude in degrees.
    Nad83,
    /// `EPSG:3857`, spherical Web Mercator in metres.
    WebMercator,
    /// `EPSG:4087`, world equidistant cylindrical (equirectangular) in metres.
    Equirectangular,
}

impl Crs {
    /// Returns the EPSG code of this CRS.
    #[must_use]
    pub const fn epsg(self) -> u32 {
        match self {
            Self::Wgs84 => 4326,
            Self::Nad83 => 4269,
            Self::WebMercator => 3857,
            Self::Equirectangular => 4087,
        }
    }

    /// Whether coordinates in this CRS are longitude/latitude degrees.
    #[must_use]
    pub const fn is_geographic(self) -> bool {
        matches!(self, Self::Wgs84 | Self::Nad83)
    }

    /// Looks up a CRS by EPSG code.
    #[must_use]
    pub const fn from_epsg(code: u32) -> Option<Self> {
        match code {
            4326 => Some(Self::Wgs84),
            4269 => Some(Self::Nad83),
            3857 | 900_913 => Some(Self::WebMercator),
            4087 => Some(Self::Equirectangular),
            _ => None,
        }
    }

    /// Projects geographic degrees into this planar CRS.
    fn forward(self, lon: f64, lat: f64) -> Result<Point<f64>, ProjectionError> {
        match self {
            Self::Wgs84 | Self::Nad83 => Ok(Point::new(lon, lat)),
            Self::WebMercator => {
                if lat.abs() >= 90.0 {
                    return Err(ProjectionError::OutOfDomain {
                        x: lon,
                        y: lat,
                        crs: self,
                    });
                }
                let x = EARTH_RADIUS_M * lon.to_radians();
                let y = EARTH_RADIUS_M
                    * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0)
                        .tan()
                        .ln();
                Ok(Point::new(x, y))
            }
            Self::Equirectangular => Ok(Point::new(
                EARTH_RADIUS_M * lon.to_radians(),
                EARTH_RADIUS_M * lat.to_radians(),
            )),
        }
    }

    /// Converts a point in this CRS back into geographic degrees.
    fn inverse(self, x: f64, y: f64) -> Point<f64> {
        match self {
            Self::Wgs84 | Self::Nad83 => Point::new(x, y),
            Self::WebMercator => {
                let lon = (x / EARTH_RADIUS_M).to_degrees();
                let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan()
                    - std::f64::consts::FRAC_PI_2)
                    .to_degrees();
                Point::new(lon, lat)
            }
            Self::Equirectangular => Point::new(
                (x / EARTH_RADIUS_M).to_degrees(),
                (y / EARTH_RADIUS_M).to_degrees(),
            ),
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

impl FromStr for Crs {
    type Err = ProjectionError;

    /// Parses identifiers such as `"epsg:3857"`, `"EPSG:4326"` or a bare
    /// `"4269"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let code = trimmed
            .get(..5)
            .filter(|prefix| prefix.eq_ignore_ascii_case("epsg:"))
            .map_or(trimmed, |_| &trimmed[5..]);

        code.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::from_epsg)
            .ok_or_else(|| ProjectionError::UnknownCrs(s.to_string()))
    }
}

impl TryFrom<String> for Crs {
    type Error = ProjectionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Crs> for String {
    fn from(crs: Crs) -> Self {
        crs.to_string()
    }
}

/// Parses a coordinate from text, rejecting empty, non-numeric and
/// non-finite values.
///
/// # Errors
///
/// Returns [`ProjectionError::Coercion`] if the text is not a finite number.
pub fn coerce(raw: &str) -> Result<f64, ProjectionError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ProjectionError::Coercion {
            value: raw.to_string(),
        })
}

/// Reprojects points from one CRS to another.
///
/// Geographic systems are treated as sharing a datum; the NAD83/WGS84 shift
/// is well under the precision the dashboards plot at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transformer {
    from: Crs,
    to: Crs,
}

impl Transformer {
    #[must_use]
    pub const fn new(from: Crs, to: Crs) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub const fn source(&self) -> Crs {
        self.from
    }

    #[must_use]
    pub const fn target(&self) -> Crs {
        self.to
    }

    /// Transforms a point given as `(x, y)` in the source CRS. For
    /// geographic sources that is `(longitude, latitude)`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::OutOfDomain`] if the input or output is not
    /// representable (latitude beyond the poles, non-finite results).
    pub fn transform(&self, x: f64, y: f64) -> Result<Point<f64>, ProjectionError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::OutOfDomain {
                x,
                y,
                crs: self.from,
            });
        }
        if self.from == self.to {
            return Ok(Point::new(x, y));
        }
        if self.from.is_geographic() && y.abs() > 90.0 {
            return Err(ProjectionError::OutOfDomain {
                x,
                y,
                crs: self.from,
            });
        }

        let geographic = self.from.inverse(x, y);
        let projected = self.to.forward(geographic.x(), geographic.y())?;

        if projected.x().is_finite() && projected.y().is_finite() {
            Ok(projected)
        } else {
            Err(ProjectionError::OutOfDomain {
                x,
                y,
                crs: self.to,
            })
        }
    }

    /// Coerces both coordinates from text, then transforms them.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::Coercion`] if either value is not numeric,
    /// or any error from [`Self::transform`].
    pub fn transform_text(&self, x: &str, y: &str) -> Result<Point<f64>, ProjectionError> {
        self.transform(coerce(x)?, coerce(y)?)
    }
}
