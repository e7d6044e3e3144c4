#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! User filter selection types for the activity map.
//!
//! A [`FilterSelection`] is owned by whichever UI layer drives the map and
//! is only ever read by the predicate engine. Every field defaults to its
//! absorbing value, so a fresh selection matches every record.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Label the UI shows for "no restriction" on a single-select field.
pub const ALL_LABEL: &str = "All";

/// A single-select dropdown value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum SingleSelect {
    /// Absorbing default; matches every record.
    #[default]
    All,
    /// Exactly this value.
    Only(String),
}

impl SingleSelect {
    /// Maps a dropdown choice to a selection. The [`ALL_LABEL`] sentinel and
    /// blank input mean [`SingleSelect::All`]; anything else is taken
    /// verbatim.
    #[must_use]
    pub fn from_choice(choice: &str) -> Self {
        if choice.trim().is_empty() || choice == ALL_LABEL {
            Self::All
        } else {
            Self::Only(choice.to_string())
        }
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(v) => Some(v),
        }
    }

    /// Whether this selection admits no more values than `other`.
    #[must_use]
    pub fn restricts_at_least(&self, other: &Self) -> bool {
        match (self, other) {
            (_, Self::All) => true,
            (Self::All, Self::Only(_)) => false,
            (Self::Only(a), Self::Only(b)) => a == b,
        }
    }
}

impl From<Option<String>> for SingleSelect {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::All, |v| Self::from_choice(&v))
    }
}

impl From<SingleSelect> for Option<String> {
    fn from(value: SingleSelect) -> Self {
        match value {
            SingleSelect::All => None,
            SingleSelect::Only(v) => Some(v),
        }
    }
}

impl std::fmt::Display for SingleSelect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL_LABEL),
            Self::Only(v) => f.write_str(v),
        }
    }
}

/// The user's current filter intent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSelection {
    /// Membership in the record's faculty partners.
    pub faculty: SingleSelect,
    /// Exact activity name.
    pub activity: SingleSelect,
    /// Membership in the record's campus partners.
    pub campus: SingleSelect,
    /// Exact county.
    pub county: SingleSelect,
    /// Exact municipality.
    pub municipality: SingleSelect,
    /// Every listed focus area must be present on the record. Empty means
    /// unrestricted.
    pub focus_areas: BTreeSet<String>,
}

impl FilterSelection {
    #[must_use]
    pub fn with_faculty(mut self, value: impl Into<String>) -> Self {
        self.faculty = SingleSelect::Only(value.into());
        self
    }

    #[must_use]
    pub fn with_activity(mut self, value: impl Into<String>) -> Self {
        self.activity = SingleSelect::Only(value.into());
        self
    }

    #[must_use]
    pub fn with_campus(mut self, value: impl Into<String>) -> Self {
        self.campus = SingleSelect::Only(value.into());
        self
    }

    #[must_use]
    pub fn with_county(mut self, value: impl Into<String>) -> Self {
        self.county = SingleSelect::Only(value.into());
        self
    }

    #[must_use]
    pub fn with_municipality(mut self, value: impl Into<String>) -> Self {
        self.municipality = SingleSelect::Only(value.into());
        self
    }

    #[must_use]
    pub fn with_focus_areas<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.focus_areas.extend(values.into_iter().map(Into::into));
        self
    }

    /// Restores every field to its absorbing default in one assignment.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether no field restricts anything.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.singles().iter().all(|s| s.is_all()) && self.focus_areas.is_empty()
    }

    /// Whether every field of `self` is at least as restrictive as the same
    /// field of `other`. When true, `self` can only match a subset of what
    /// `other` matches.
    #[must_use]
    pub fn restricts_at_least(&self, other: &Self) -> bool {
        self.singles()
            .iter()
            .zip(other.singles())
            .all(|(mine, theirs)| mine.restricts_at_least(theirs))
            && self.focus_areas.is_superset(&other.focus_areas)
    }

    const fn singles(&self) -> [&SingleSelect; 5] {
        [
            &self.faculty,
            &self.activity,
            &self.campus,
            &self.county,
            &self.municipality,
        ]
    }
}
