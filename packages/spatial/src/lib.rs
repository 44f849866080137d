#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory spatial indexes for the traffic map.
//!
//! [`nearest`] attributes each accident to its closest hospital in the
//! projected plane, either by scanning every hospital or by querying an
//! R-tree. [`proximity`] answers fixed-radius queries over cross start
//! positions. Both are built once from static data and never mutated.

pub mod nearest;
pub mod proximity;

pub use nearest::{HospitalIndex, Nearest, NearestHospitalFinder};
pub use proximity::SpatialProximityIndex;
