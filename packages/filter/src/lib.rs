#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Conjunctive filter predicates over normalized activity records.
//!
//! A record is included only if it satisfies every field of the
//! [`FilterSelection`]. Each field's default is absorbing, so fields
//! compose independently and adding a restriction can only shrink the
//! result. Evaluation is pure and total: unknown values simply match
//! nothing.

use engagement_map_activity_models::ActivityRecord;
use engagement_map_filter_models::{FilterSelection, SingleSelect};

/// Whether `record` satisfies every field of `selection`.
#[must_use]
pub fn matches(record: &ActivityRecord, selection: &FilterSelection) -> bool {
    matches_exact(record.name.as_deref(), &selection.activity)
        && matches_member(&record.faculty_partners, &selection.faculty)
        && matches_member(&record.campus_partners, &selection.campus)
        && matches_exact(record.county.as_deref(), &selection.county)
        && matches_exact(record.municipality.as_deref(), &selection.municipality)
        && selection
            .focus_areas
            .iter()
            .all(|required| record.focus_areas.contains(required))
}

/// Returns the records matching `selection`, in dataset order.
#[must_use]
pub fn filter_records<'a>(
    records: &'a [ActivityRecord],
    selection: &FilterSelection,
) -> Vec<&'a ActivityRecord> {
    let matched: Vec<&ActivityRecord> = records
        .iter()
        .filter(|record| matches(record, selection))
        .collect();

    log::debug!(
        "Filter matched {}/{} activities",
        matched.len(),
        records.len()
    );

    matched
}

/// Single-select exact equality, case-sensitive. An absent field never
/// matches a concrete value.
fn matches_exact(field: Option<&str>, select: &SingleSelect) -> bool {
    match select {
        SingleSelect::All => true,
        SingleSelect::Only(wanted) => field == Some(wanted.as_str()),
    }
}

/// Single-select membership in a multi-value field.
fn matches_member(values: &[String], select: &SingleSelect) -> bool {
    match select {
        SingleSelect::All => true,
        SingleSelect::Only(wanted) => values.iter().any(|v| v == wanted),
    }
}
