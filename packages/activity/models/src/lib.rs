#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Community engagement activity record types.
//!
//! A spreadsheet row arrives as a [`RawRow`] of loosely-typed
//! [`RawValue`] cells and is normalized once into a strongly-typed
//! [`ActivityRecord`]. Everything downstream (filtering, geofencing,
//! option lists, rendering hand-off) works on the typed form only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Spreadsheet placeholder for an empty cell once it has been stringified.
pub const MISSING_SENTINEL: &str = "nan";

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Latitude, `-90..=90`.
    pub latitude: f64,
    /// Longitude, `-180..=180`.
    pub longitude: f64,
}

impl Location {
    /// Builds a location, returning `None` unless both axes are finite and
    /// within WGS84 range.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        if latitude.abs() > 90.0 || longitude.abs() > 180.0 {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
        })
    }
}

/// A single cell as produced by a table-reading collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Null, empty, or absent column.
    Missing,
    /// Any textual cell.
    Text(String),
    /// A numeric cell.
    Number(f64),
}

impl RawValue {
    /// Returns the trimmed textual content of the cell, or `None` when the
    /// cell is missing, blank, the `nan` sentinel, or a non-finite number.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Missing => None,
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(MISSING_SENTINEL) {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Self::Number(n) if n.is_finite() => Some(n.to_string()),
            Self::Number(_) => None,
        }
    }

    /// Returns the cell as a finite number, parsing text if needed.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Missing => return None,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Number(n) => *n,
        };
        value.is_finite().then_some(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One source row keyed by column header.
pub type RawRow = BTreeMap<String, RawValue>;

/// Fields that contribute selectable values to the filter UI.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityField {
    /// Comma-separated faculty partner names.
    FacultyPartners,
    /// Comma-separated focus areas.
    FocusAreas,
    /// Comma-separated campus partner names.
    CampusPartners,
    /// The activity name itself.
    ActivityName,
    /// County the activity is recorded under.
    County,
    /// Municipality the activity is recorded under.
    Municipality,
}

impl ActivityField {
    /// Every option-list field, in UI order.
    pub const ALL: &[Self] = &[
        Self::FacultyPartners,
        Self::FocusAreas,
        Self::ActivityName,
        Self::CampusPartners,
        Self::County,
        Self::Municipality,
    ];

    /// Human-readable label for prompts and headings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FacultyPartners => "Faculty",
            Self::FocusAreas => "Focus Areas",
            Self::CampusPartners => "Campus Partner",
            Self::ActivityName => "Activity",
            Self::County => "County",
            Self::Municipality => "Municipality",
        }
    }
}

/// Column headers to read each record field from.
///
/// Defaults match the cleaned activities spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub name: String,
    pub detail_url: String,
    pub faculty_partners: String,
    pub campus_partners: String,
    pub focus_areas: String,
    pub community_organizations: String,
    pub primary_contact: String,
    pub contact_email: String,
    pub contact_url: String,
    pub latitude: String,
    pub longitude: String,
    pub program_name: String,
    pub county: String,
    pub municipality: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            name: "activity_name".to_string(),
            detail_url: "activity_url".to_string(),
            faculty_partners: "faculty_partners".to_string(),
            campus_partners: "campus_partners".to_string(),
            focus_areas: "focus_cleaned".to_string(),
            community_organizations: "community_organizations".to_string(),
            primary_contact: "primary_contact".to_string(),
            contact_email: "primary_contact_email".to_string(),
            contact_url: "faculty_url".to_string(),
            latitude: "primary_site_lat".to_string(),
            longitude: "primary_site_long".to_string(),
            program_name: "Program_Name".to_string(),
            county: "County".to_string(),
            municipality: "Municipality".to_string(),
        }
    }
}

/// One community engagement activity after normalization.
///
/// Multi-value fields never contain empty strings and keep the source's
/// first-seen order, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub name: Option<String>,
    pub detail_url: Option<String>,
    pub faculty_partners: Vec<String>,
    pub campus_partners: Vec<String>,
    pub focus_areas: Vec<String>,
    /// Display-only; never filtered on.
    pub community_organizations: Option<String>,
    pub primary_contact: Option<String>,
    pub contact_email: Option<String>,
    pub contact_url: Option<String>,
    pub program_name: Option<String>,
    pub county: Option<String>,
    pub municipality: Option<String>,
    /// True site position. `None` keeps the record out of every map
    /// operation while leaving it available for listings.
    pub location: Option<Location>,
    /// Marker position, derived from `location` once per data load.
    pub jittered_location: Option<Location>,
}

/// A contact name, optionally hyperlinked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactLink {
    pub name: String,
    pub url: Option<String>,
}

impl ActivityRecord {
    /// Returns the values this record contributes to an option list.
    #[must_use]
    pub fn values_for(&self, field: ActivityField) -> Vec<&str> {
        match field {
            ActivityField::FacultyPartners => {
                self.faculty_partners.iter().map(String::as_str).collect()
            }
            ActivityField::FocusAreas => self.focus_areas.iter().map(String::as_str).collect(),
            ActivityField::CampusPartners => {
                self.campus_partners.iter().map(String::as_str).collect()
            }
            ActivityField::ActivityName => self.name.as_deref().into_iter().collect(),
            ActivityField::County => self.county.as_deref().into_iter().collect(),
            ActivityField::Municipality => self.municipality.as_deref().into_iter().collect(),
        }
    }

    /// Whether the record can be placed on a map.
    #[must_use]
    pub const fn is_mappable(&self) -> bool {
        self.location.is_some()
    }

    /// The primary contact, linked to the contact URL when one exists.
    #[must_use]
    pub fn contact_link(&self) -> Option<ContactLink> {
        let name = self.primary_contact.clone()?;
        Some(ContactLink {
            name,
            url: self.contact_url.clone(),
        })
    }

    /// Re-expresses the record as a raw row under `columns`.
    ///
    /// Multi-value fields are joined with `", "` so that normalizing the
    /// result yields this record again (minus the derived jitter).
    #[must_use]
    pub fn to_raw_row(&self, columns: &ColumnMapping) -> RawRow {
        fn text(value: Option<&String>) -> RawValue {
            value.map_or(RawValue::Missing, |s| RawValue::Text(s.clone()))
        }
        fn joined(values: &[String]) -> RawValue {
            if values.is_empty() {
                RawValue::Missing
            } else {
                RawValue::Text(values.join(", "))
            }
        }

        let mut row = RawRow::new();
        row.insert(columns.name.clone(), text(self.name.as_ref()));
        row.insert(columns.detail_url.clone(), text(self.detail_url.as_ref()));
        row.insert(
            columns.faculty_partners.clone(),
            joined(&self.faculty_partners),
        );
        row.insert(
            columns.campus_partners.clone(),
            joined(&self.campus_partners),
        );
        row.insert(columns.focus_areas.clone(), joined(&self.focus_areas));
        row.insert(
            columns.community_organizations.clone(),
            text(self.community_organizations.as_ref()),
        );
        row.insert(
            columns.primary_contact.clone(),
            text(self.primary_contact.as_ref()),
        );
        row.insert(
            columns.contact_email.clone(),
            text(self.contact_email.as_ref()),
        );
        row.insert(columns.contact_url.clone(), text(self.contact_url.as_ref()));
        row.insert(
            columns.program_name.clone(),
            text(self.program_name.as_ref()),
        );
        row.insert(columns.county.clone(), text(self.county.as_ref()));
        row.insert(
            columns.municipality.clone(),
            text(self.municipality.as_ref()),
        );

        let (lat, lng) = self.location.map_or((RawValue::Missing, RawValue::Missing), |loc| {
            (
                RawValue::Number(loc.latitude),
                RawValue::Number(loc.longitude),
            )
        });
        row.insert(columns.latitude.clone(), lat);
        row.insert(columns.longitude.clone(), lng);

        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_text_treats_blank_and_sentinel_as_missing() {
        assert_eq!(RawValue::from("   ").as_text(), None);
        assert_eq!(RawValue::from("NaN").as_text(), None);
        assert_eq!(RawValue::Missing.as_text(), None);
        assert_eq!(
            RawValue::from("  Smith ").as_text().as_deref(),
            Some("Smith")
        );
    }

    #[test]
    fn raw_number_stringifies_without_trailing_zero() {
        assert_eq!(RawValue::Number(42.0).as_text().as_deref(), Some("42"));
        assert_eq!(RawValue::Number(f64::NAN).as_text(), None);
    }

    #[test]
    fn raw_f64_parses_text_and_rejects_garbage() {
        assert_eq!(RawValue::from(" 40.5 ").as_f64(), Some(40.5));
        assert_eq!(RawValue::from("north").as_f64(), None);
        assert_eq!(RawValue::Number(f64::INFINITY).as_f64(), None);
    }

    #[test]
    fn location_rejects_out_of_range() {
        assert!(Location::new(40.0, -74.0).is_some());
        assert!(Location::new(91.0, -74.0).is_none());
        assert!(Location::new(40.0, -181.0).is_none());
        assert!(Location::new(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn activity_field_parses_snake_case() {
        for field in ActivityField::ALL {
            let parsed: ActivityField = field.as_ref().parse().unwrap();
            assert_eq!(parsed, *field);
        }
        assert_eq!(
            "focus_areas".parse::<ActivityField>().unwrap(),
            ActivityField::FocusAreas
        );
    }

    #[test]
    fn contact_link_needs_a_name() {
        let mut record = ActivityRecord {
            contact_url: Some("https://example.edu/smith".to_string()),
            ..ActivityRecord::default()
        };
        assert!(record.contact_link().is_none());

        record.primary_contact = Some("Dr. Smith".to_string());
        let link = record.contact_link().unwrap();
        assert_eq!(link.name, "Dr. Smith");
        assert_eq!(link.url.as_deref(), Some("https://example.edu/smith"));
    }

    #[test]
    fn values_for_single_valued_fields() {
        let record = ActivityRecord {
            name: Some("Garden Day".to_string()),
            county: Some("Middlesex".to_string()),
            ..ActivityRecord::default()
        };
        assert_eq!(
            record.values_for(ActivityField::ActivityName),
            vec!["Garden Day"]
        );
        assert_eq!(record.values_for(ActivityField::County), vec!["Middlesex"]);
        assert!(record.values_for(ActivityField::Municipality).is_empty());
    }
}
