#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the engagement map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the normalized record types to allow independent evolution of the
//! API contract.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use engagement_map_activity_models::{ActivityField, ActivityRecord, ContactLink, Location};
use engagement_map_filter_models::{FilterSelection, SingleSelect};
use engagement_map_geofence_models::RegionAggregate;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Query parameters shared by the activity and region endpoints.
///
/// Single-select fields accept a value or the `All` sentinel; omitting a
/// field means no restriction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQueryParams {
    pub faculty: Option<String>,
    pub activity: Option<String>,
    pub campus: Option<String>,
    pub county: Option<String>,
    pub municipality: Option<String>,
    /// Required focus areas, comma-separated.
    pub focus: Option<String>,
}

impl ActivityQueryParams {
    /// Builds the filter selection these parameters describe.
    #[must_use]
    pub fn to_selection(&self) -> FilterSelection {
        let single =
            |value: Option<&str>| value.map_or(SingleSelect::All, SingleSelect::from_choice);

        FilterSelection {
            faculty: single(self.faculty.as_deref()),
            activity: single(self.activity.as_deref()),
            campus: single(self.campus.as_deref()),
            county: single(self.county.as_deref()),
            municipality: single(self.municipality.as_deref()),
            focus_areas: self
                .focus
                .as_deref()
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .map(ToString::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Dropdown and multiselect choices for the current dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOptions {
    /// Dataset version the lists were derived from.
    pub version: u64,
    pub loaded_at: DateTime<Utc>,
    /// Sorted, deduplicated values per field.
    pub options: BTreeMap<ActivityField, Vec<String>>,
    /// Mean marker position, for initial map centring.
    pub center: Option<Location>,
}

/// An activity as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiActivity {
    pub name: Option<String>,
    pub detail_url: Option<String>,
    pub program_name: Option<String>,
    pub faculty_partners: Vec<String>,
    pub campus_partners: Vec<String>,
    pub focus_areas: Vec<String>,
    pub community_organizations: Option<String>,
    /// Primary contact, linked when a URL is known.
    pub contact: Option<ContactLink>,
    pub contact_email: Option<String>,
    pub county: Option<String>,
    pub municipality: Option<String>,
    /// Jittered marker latitude; absent for unlocated activities.
    pub latitude: Option<f64>,
    /// Jittered marker longitude; absent for unlocated activities.
    pub longitude: Option<f64>,
    /// Region containing the true site location.
    pub region: Option<String>,
}

impl ApiActivity {
    #[must_use]
    pub fn new(record: &ActivityRecord, region: Option<String>) -> Self {
        Self {
            name: record.name.clone(),
            detail_url: record.detail_url.clone(),
            program_name: record.program_name.clone(),
            faculty_partners: record.faculty_partners.clone(),
            campus_partners: record.campus_partners.clone(),
            focus_areas: record.focus_areas.clone(),
            community_organizations: record.community_organizations.clone(),
            contact: record.contact_link(),
            contact_email: record.contact_email.clone(),
            county: record.county.clone(),
            municipality: record.municipality.clone(),
            latitude: record.jittered_location.map(|l| l.latitude),
            longitude: record.jittered_location.map(|l| l.longitude),
            region,
        }
    }
}

/// Response for `GET /api/activities`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiActivities {
    pub version: u64,
    /// Number of matching activities, located or not.
    pub total: usize,
    pub activities: Vec<ApiActivity>,
    pub regions: RegionAggregate,
}

/// Response for `GET /api/regions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRegions {
    pub version: u64,
    #[serde(flatten)]
    pub aggregate: RegionAggregate,
}

/// Response for `POST /api/reload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReload {
    pub version: u64,
    pub records: usize,
    pub loaded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(value: serde_json::Value) -> ActivityQueryParams {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_params_are_unrestricted() {
        assert!(params(serde_json::json!({})).to_selection().is_unrestricted());
    }

    #[test]
    fn all_sentinel_maps_to_no_restriction() {
        let selection = params(serde_json::json!({ "faculty": "All", "county": "Middlesex" }))
            .to_selection();
        assert!(selection.faculty.is_all());
        assert_eq!(selection.county.value(), Some("Middlesex"));
    }

    #[test]
    fn focus_is_split_on_commas() {
        let selection = params(serde_json::json!({ "focus": "Health, Education,,"})).to_selection();
        let focus: Vec<&str> = selection.focus_areas.iter().map(String::as_str).collect();
        assert_eq!(focus, ["Education", "Health"]);
    }

    #[test]
    fn activity_uses_jittered_position_and_contact_link() {
        let record = ActivityRecord {
            name: Some("Garden".to_string()),
            primary_contact: Some("Dr. Smith".to_string()),
            contact_url: Some("https://example.edu/smith".to_string()),
            location: Location::new(40.5, -74.4),
            jittered_location: Location::new(40.5005, -74.4005),
            ..ActivityRecord::default()
        };
        let api = ApiActivity::new(&record, Some("Middlesex".to_string()));

        assert_eq!(api.latitude, Some(40.5005));
        assert_eq!(
            api.contact.and_then(|c| c.url).as_deref(),
            Some("https://example.edu/smith")
        );

        let json = serde_json::to_value(ApiActivity::new(&record, None)).unwrap();
        assert_eq!(json["detailUrl"], serde_json::Value::Null);
        assert_eq!(json["region"], serde_json::Value::Null);
    }
}
