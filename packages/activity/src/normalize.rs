//! Converts raw table rows into [`ActivityRecord`] values.
//!
//! Normalization never fails. A bad cell degrades to an absent value or an
//! empty list so that one broken spreadsheet row cannot keep the rest of
//! the dataset off the map.

use engagement_map_activity_models::{
    ActivityRecord, ColumnMapping, Location, MISSING_SENTINEL, RawRow, RawValue,
};

/// Normalizes rows using a configurable [`ColumnMapping`].
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    columns: ColumnMapping,
}

impl Normalizer {
    #[must_use]
    pub const fn new(columns: ColumnMapping) -> Self {
        Self { columns }
    }

    #[must_use]
    pub const fn columns(&self) -> &ColumnMapping {
        &self.columns
    }

    /// Normalizes a single raw row. Columns absent from the row are
    /// treated as missing.
    #[must_use]
    pub fn normalize(&self, row: &RawRow) -> ActivityRecord {
        let cols = &self.columns;
        let cell = |column: &str| row.get(column).unwrap_or(&RawValue::Missing);
        let text = |column: &str| cell(column).as_text();

        ActivityRecord {
            name: text(&cols.name),
            detail_url: text(&cols.detail_url),
            faculty_partners: split_multi_value(cell(&cols.faculty_partners)),
            campus_partners: split_multi_value(cell(&cols.campus_partners)),
            focus_areas: split_multi_value(cell(&cols.focus_areas)),
            community_organizations: text(&cols.community_organizations),
            primary_contact: text(&cols.primary_contact),
            contact_email: text(&cols.contact_email),
            contact_url: text(&cols.contact_url),
            program_name: text(&cols.program_name),
            county: text(&cols.county),
            municipality: text(&cols.municipality),
            location: parse_location(cell(&cols.latitude), cell(&cols.longitude)),
            jittered_location: None,
        }
    }

    /// Normalizes every row, preserving source order.
    #[must_use]
    pub fn normalize_all(&self, rows: &[RawRow]) -> Vec<ActivityRecord> {
        let records: Vec<ActivityRecord> = rows.iter().map(|row| self.normalize(row)).collect();

        let unmapped = records.iter().filter(|r| !r.is_mappable()).count();
        if unmapped > 0 {
            log::warn!(
                "{unmapped}/{} activity rows have no usable coordinates and will only appear in listings",
                records.len()
            );
        }

        records
    }
}

/// Normalizes a row with the default spreadsheet column names.
#[must_use]
pub fn normalize(row: &RawRow) -> ActivityRecord {
    Normalizer::default().normalize(row)
}

/// Splits a comma-joined cell into trimmed, non-empty fragments in
/// first-seen order. Duplicates are kept; `nan` fragments are dropped.
#[must_use]
pub fn split_multi_value(value: &RawValue) -> Vec<String> {
    let Some(text) = value.as_text() else {
        return Vec::new();
    };

    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(MISSING_SENTINEL))
        .map(ToString::to_string)
        .collect()
}

/// Parses a latitude/longitude pair. Both must be present, numeric, and in
/// range, otherwise the location is absent.
#[must_use]
pub fn parse_location(lat: &RawValue, lng: &RawValue) -> Option<Location> {
    Location::new(lat.as_f64()?, lng.as_f64()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, RawValue)]) -> RawRow {
        cells
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn splits_trims_and_drops_empty_fragments() {
        let value = RawValue::from(" Smith ,, Jones,  ,Lee ");
        assert_eq!(split_multi_value(&value), vec!["Smith", "Jones", "Lee"]);
    }

    #[test]
    fn split_keeps_duplicates_in_order() {
        let value = RawValue::from("Health, Education, Health");
        assert_eq!(
            split_multi_value(&value),
            vec!["Health", "Education", "Health"]
        );
    }

    #[test]
    fn missing_multi_value_is_empty() {
        assert!(split_multi_value(&RawValue::Missing).is_empty());
        assert!(split_multi_value(&RawValue::from("nan")).is_empty());
        assert!(split_multi_value(&RawValue::from(" , ")).is_empty());
    }

    #[test]
    fn location_requires_both_axes() {
        assert!(parse_location(&RawValue::Number(40.5), &RawValue::Missing).is_none());
        assert!(parse_location(&RawValue::Missing, &RawValue::Number(-74.4)).is_none());
        assert!(parse_location(&RawValue::from("n/a"), &RawValue::Number(-74.4)).is_none());

        let loc = parse_location(&RawValue::from("40.5"), &RawValue::Number(-74.4)).unwrap();
        assert!((loc.latitude - 40.5).abs() < f64::EPSILON);
        assert!((loc.longitude - -74.4).abs() < f64::EPSILON);
    }

    #[test]
    fn normalizes_full_row() {
        let raw = row(&[
            ("activity_name", RawValue::from(" Food Drive ")),
            ("activity_url", RawValue::from("https://example.edu/food")),
            ("faculty_partners", RawValue::from("Smith, Jones")),
            ("campus_partners", RawValue::Missing),
            ("focus_cleaned", RawValue::from("Health")),
            ("primary_contact", RawValue::from("Pat Doe")),
            ("faculty_url", RawValue::from("nan")),
            ("primary_site_lat", RawValue::Number(40.49)),
            ("primary_site_long", RawValue::Number(-74.45)),
            ("County", RawValue::from("Middlesex")),
        ]);

        let record = normalize(&raw);
        assert_eq!(record.name.as_deref(), Some("Food Drive"));
        assert_eq!(record.faculty_partners, vec!["Smith", "Jones"]);
        assert!(record.campus_partners.is_empty());
        assert_eq!(record.focus_areas, vec!["Health"]);
        assert_eq!(record.contact_url, None);
        assert_eq!(record.county.as_deref(), Some("Middlesex"));
        assert!(record.community_organizations.is_none());
        assert!(record.is_mappable());
        assert!(record.jittered_location.is_none());
    }

    #[test]
    fn tolerates_missing_columns() {
        let record = normalize(&RawRow::new());
        assert_eq!(record, ActivityRecord::default());
    }

    #[test]
    fn custom_columns_are_honoured() {
        let columns = ColumnMapping {
            name: "Title".to_string(),
            latitude: "lat".to_string(),
            longitude: "lon".to_string(),
            ..ColumnMapping::default()
        };
        let normalizer = Normalizer::new(columns);
        let raw = row(&[
            ("Title", RawValue::from("Tutoring")),
            ("lat", RawValue::from("40.1")),
            ("lon", RawValue::from("-74.2")),
        ]);

        let record = normalizer.normalize(&raw);
        assert_eq!(record.name.as_deref(), Some("Tutoring"));
        assert!(record.location.is_some());
    }

    #[test]
    fn normalization_is_idempotent() {
        let normalizer = Normalizer::default();
        let raw = row(&[
            ("activity_name", RawValue::from("  Reading Buddies")),
            ("faculty_partners", RawValue::from("Smith ,Jones,,Smith")),
            ("campus_partners", RawValue::from("Rutgers Libraries")),
            ("focus_cleaned", RawValue::from(" Education ")),
            ("primary_contact_email", RawValue::from("pat@example.edu")),
            ("primary_site_lat", RawValue::from("40.123456789")),
            ("primary_site_long", RawValue::Number(-74.987_654_321)),
        ]);

        let once = normalizer.normalize(&raw);
        let twice = normalizer.normalize(&once.to_raw_row(normalizer.columns()));
        assert_eq!(once, twice);
    }

    #[test]
    fn nan_fragments_are_dropped_and_stay_dropped() {
        let normalizer = Normalizer::default();
        let raw = row(&[
            ("faculty_partners", RawValue::from("nan ,")),
            ("focus_cleaned", RawValue::from("Health, NaN, Education")),
        ]);

        let once = normalizer.normalize(&raw);
        assert!(once.faculty_partners.is_empty());
        assert_eq!(once.focus_areas, ["Health", "Education"]);

        let twice = normalizer.normalize(&once.to_raw_row(normalizer.columns()));
        assert_eq!(once, twice);
    }

    #[test]
    fn numeric_name_cell_is_stringified() {
        let raw = row(&[("activity_name", RawValue::Number(2024.0))]);
        assert_eq!(normalize(&raw).name.as_deref(), Some("2024"));
    }
}
