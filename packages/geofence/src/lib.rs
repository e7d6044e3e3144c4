#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Point-in-region classification for activity markers.
//!
//! Region polygons (counties, municipalities) are loaded once per session
//! from `GeoJSON`, indexed in an R-tree, and used to assign each located
//! activity to at most one region. [`aggregate`] turns those assignments
//! into per-region counts and percentages for choropleth colouring.

pub mod aggregate;
pub mod boundaries;
pub mod index;
pub mod policy;

pub use aggregate::{aggregate, tally};
pub use index::{Region, RegionIndex};
pub use policy::Geofence;

use thiserror::Error;

/// Errors that can occur while loading region boundaries.
///
/// A boundary source that cannot be read is always an error; it is never
/// reported as an empty region set, since that would misclassify every
/// point as outside all regions.
#[derive(Debug, Error)]
pub enum GeofenceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The document is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The document was readable but yielded no usable region.
    #[error("No regions loaded from {source_name}")]
    NoRegions {
        /// Description of the boundary source.
        source_name: String,
    },
}
