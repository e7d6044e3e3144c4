//! The in-memory activity dataset and its reload-safe holder.
//!
//! A [`Dataset`] is immutable once built: normalized records, their cached
//! jitter, and the derived option lists all belong to one load. Reloading
//! builds a complete new dataset and swaps it into the [`DatasetStore`] in
//! a single write, so readers always see either the old or the new load.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use engagement_map_activity_models::{ActivityRecord, Location, RawRow};

use crate::jitter::{JitterConfig, jitter};
use crate::normalize::Normalizer;
use crate::options::OptionLists;

/// One load of the activity table.
#[derive(Debug, Clone)]
pub struct Dataset {
    version: u64,
    loaded_at: DateTime<Utc>,
    records: Vec<ActivityRecord>,
    options: OptionLists,
}

impl Dataset {
    /// Normalizes `rows`, applies jitter once per record, and derives the
    /// option lists.
    #[must_use]
    pub fn build(
        rows: &[RawRow],
        normalizer: &Normalizer,
        jitter_config: &JitterConfig,
        version: u64,
    ) -> Self {
        let records = normalizer.normalize_all(rows);
        Self::from_records(records, jitter_config, version)
    }

    /// Builds a dataset from already-normalized records, replacing any
    /// previous jitter.
    #[must_use]
    pub fn from_records(
        mut records: Vec<ActivityRecord>,
        jitter_config: &JitterConfig,
        version: u64,
    ) -> Self {
        let mut rng = jitter_config.rng();
        for record in &mut records {
            record.jittered_location = jitter(record.location, jitter_config.scale, &mut rng);
        }

        let options = OptionLists::derive(&records);

        log::info!(
            "Built activity dataset v{version}: {} records ({} mappable)",
            records.len(),
            records.iter().filter(|r| r.is_mappable()).count()
        );

        Self {
            version,
            loaded_at: Utc::now(),
            records,
            options,
        }
    }

    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    #[must_use]
    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    #[must_use]
    pub const fn options(&self) -> &OptionLists {
        &self.options
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Mean marker position over all mappable records, used to centre the
    /// initial map view. `None` when nothing is mappable.
    #[must_use]
    pub fn center(&self) -> Option<Location> {
        let (sum_lat, sum_lng, n) = self
            .records
            .iter()
            .filter_map(|r| r.jittered_location)
            .fold((0.0, 0.0, 0_u32), |(lat, lng, n), loc| {
                (lat + loc.latitude, lng + loc.longitude, n + 1)
            });

        if n == 0 {
            return None;
        }

        let n = f64::from(n);
        Location::new(sum_lat / n, sum_lng / n)
    }
}

/// Shared holder for the current [`Dataset`].
///
/// Readers take an [`Arc`] snapshot and keep using it for a whole
/// evaluation pass even if a reload lands mid-way.
#[derive(Debug)]
pub struct DatasetStore {
    current: RwLock<Arc<Dataset>>,
}

impl DatasetStore {
    #[must_use]
    pub fn new(dataset: Dataset) -> Self {
        Self {
            current: RwLock::new(Arc::new(dataset)),
        }
    }

    /// Returns the dataset current at the time of the call.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Dataset> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the current dataset, returning the previous one.
    pub fn replace(&self, dataset: Dataset) -> Arc<Dataset> {
        let next = Arc::new(dataset);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Version the next reload should carry.
    #[must_use]
    pub fn next_version(&self) -> u64 {
        self.snapshot().version() + 1
    }
}

#[cfg(test)]
mod tests {
    use engagement_map_activity_models::RawValue;

    use super::*;

    fn rows() -> Vec<RawRow> {
        let mk = |name: &str, lat: Option<f64>, lng: Option<f64>| -> RawRow {
            let mut row = RawRow::new();
            row.insert("activity_name".to_string(), RawValue::from(name));
            row.insert(
                "primary_site_lat".to_string(),
                lat.map_or(RawValue::Missing, RawValue::Number),
            );
            row.insert(
                "primary_site_long".to_string(),
                lng.map_or(RawValue::Missing, RawValue::Number),
            );
            row
        };
        vec![
            mk("A", Some(40.50), Some(-74.45)),
            mk("B", Some(40.50), Some(-74.45)),
            mk("C", None, Some(-74.45)),
        ]
    }

    #[test]
    fn build_caches_jitter_for_mappable_records_only() {
        let dataset = Dataset::build(&rows(), &Normalizer::default(), &JitterConfig::default(), 1);

        let records = dataset.records();
        assert!(records[0].jittered_location.is_some());
        assert!(records[1].jittered_location.is_some());
        assert!(records[2].jittered_location.is_none());
        assert_ne!(
            records[0].jittered_location, records[1].jittered_location,
            "co-located activities should be pulled apart"
        );
    }

    #[test]
    fn seeded_reload_reproduces_marker_positions() {
        let config = JitterConfig::default();
        let first = Dataset::build(&rows(), &Normalizer::default(), &config, 1);
        let second = Dataset::build(&rows(), &Normalizer::default(), &config, 2);

        let positions = |d: &Dataset| {
            d.records()
                .iter()
                .map(|r| r.jittered_location)
                .collect::<Vec<_>>()
        };
        assert_eq!(positions(&first), positions(&second));
    }

    #[test]
    fn option_lists_are_built_with_the_dataset() {
        let dataset = Dataset::build(&rows(), &Normalizer::default(), &JitterConfig::default(), 1);
        assert_eq!(
            dataset
                .options()
                .get(engagement_map_activity_models::ActivityField::ActivityName),
            ["A", "B", "C"]
        );
    }

    #[test]
    fn center_averages_jittered_positions() {
        let config = JitterConfig {
            scale: 0.0,
            seed: Some(1),
        };
        let dataset = Dataset::build(&rows(), &Normalizer::default(), &config, 1);
        let center = dataset.center().unwrap();
        assert!((center.latitude - 40.50).abs() < 1e-9);
        assert!((center.longitude - -74.45).abs() < 1e-9);

        let empty = Dataset::from_records(Vec::new(), &config, 1);
        assert!(empty.center().is_none());
    }

    #[test]
    fn store_swaps_whole_datasets() {
        let config = JitterConfig::default();
        let store = DatasetStore::new(Dataset::build(&rows(), &Normalizer::default(), &config, 1));

        let held = store.snapshot();
        assert_eq!(store.next_version(), 2);

        let previous = store.replace(Dataset::from_records(Vec::new(), &config, 2));
        assert_eq!(previous.version(), 1);
        assert_eq!(held.len(), 3, "existing snapshots are unaffected by a reload");
        assert_eq!(store.snapshot().version(), 2);
        assert!(store.snapshot().is_empty());
    }
}
