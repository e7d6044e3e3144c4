#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region boundary source definitions and per-region aggregate types.
//!
//! Boundary sources are deserialized from the dashboard TOML config and
//! describe where a `GeoJSON` `FeatureCollection` of region polygons lives
//! and which feature property names each region.

use serde::{Deserialize, Serialize};

/// Property naming each region when none is configured.
pub const DEFAULT_NAME_PROPERTY: &str = "NAME";

/// Where a boundary `GeoJSON` document is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundaryLocation {
    /// Local `GeoJSON` file.
    File {
        /// Path to the file.
        path: String,
    },
    /// `GeoJSON` fetched over HTTP(S).
    Url {
        /// Full URL returning a `FeatureCollection`.
        url: String,
    },
}

impl std::fmt::Display for BoundaryLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File { path } => write!(f, "file {path}"),
            Self::Url { url } => write!(f, "{url}"),
        }
    }
}

/// Keeps only features whose `property` equals `equals`.
///
/// Numeric property values are compared by their JSON text, so
/// `equals = "34"` matches both `"34"` and `34`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub property: String,
    pub equals: String,
}

/// A named set of region polygons (e.g. the counties of one state).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundarySource {
    /// Where to read the `FeatureCollection` from.
    pub source: BoundaryLocation,
    /// Feature property holding the region name.
    #[serde(default = "default_name_property")]
    pub name_property: String,
    /// Optional feature filter.
    #[serde(default)]
    pub filter: Option<PropertyFilter>,
}

fn default_name_property() -> String {
    DEFAULT_NAME_PROPERTY.to_string()
}

/// Whether located activities must fall inside the study area to be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryPolicyConfig {
    /// Drop located activities outside the study area from the filtered
    /// set. Activities without coordinates are never dropped by this.
    pub require_inside: bool,
    /// Explicit study-area outline. When unset, the union of the regions
    /// is the study area.
    pub outline: Option<BoundarySource>,
}

/// Count of filtered activities inside one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionCount {
    /// Region name.
    pub name: String,
    /// Number of activities classified into this region.
    pub count: u64,
    /// Share of all classified activities, `0.0..=100.0`.
    pub percentage: f64,
}

/// Per-region breakdown of a filtered activity set.
///
/// Every region is listed, in load order, including regions with a zero
/// count. Whether to label zero regions is a presentation decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionAggregate {
    pub regions: Vec<RegionCount>,
    /// Sum of every region count.
    pub total: u64,
    /// Located activities that fell inside no region.
    pub unassigned: u64,
}

impl RegionAggregate {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegionCount> {
        self.regions.iter().find(|r| r.name == name)
    }

    #[must_use]
    pub fn count_for(&self, name: &str) -> u64 {
        self.get(name).map_or(0, |r| r.count)
    }

    #[must_use]
    pub fn percentage_for(&self, name: &str) -> f64 {
        self.get(name).map_or(0.0, |r| r.percentage)
    }
}
