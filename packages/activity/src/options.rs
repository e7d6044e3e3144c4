//! Selectable filter values derived from the loaded dataset.

use std::collections::{BTreeMap, BTreeSet};

use engagement_map_activity_models::{ActivityField, ActivityRecord};
use serde::Serialize;

/// Returns the sorted, de-duplicated values `field` takes across every
/// record, flattening multi-value fields.
///
/// Ordering is natural string ordering (byte-wise, so case-sensitive).
#[must_use]
pub fn derive_options(records: &[ActivityRecord], field: ActivityField) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.values_for(field))
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

/// Option lists for every filterable field, computed once per dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OptionLists {
    lists: BTreeMap<ActivityField, Vec<String>>,
}

impl OptionLists {
    #[must_use]
    pub fn derive(records: &[ActivityRecord]) -> Self {
        let lists = ActivityField::ALL
            .iter()
            .map(|field| (*field, derive_options(records, *field)))
            .collect();
        Self { lists }
    }

    /// The option list for `field`, empty if the dataset has no values.
    #[must_use]
    pub fn get(&self, field: ActivityField) -> &[String] {
        self.lists.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActivityField, &[String])> {
        self.lists.iter().map(|(field, values)| (*field, values.as_slice()))
    }
}
