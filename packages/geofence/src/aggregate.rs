//! Per-region activity counts for choropleth colouring.

use engagement_map_activity_models::ActivityRecord;
use engagement_map_geofence_models::{RegionAggregate, RegionCount};

use crate::index::RegionIndex;

/// Classifies each record by its true (un-jittered) location and counts
/// the results per region.
///
/// Records without a location are not counted anywhere. Located records
/// outside every region are counted as `unassigned`.
#[must_use]
pub fn aggregate(records: &[&ActivityRecord], index: &RegionIndex) -> RegionAggregate {
    tally(
        index,
        records
            .iter()
            .filter_map(|record| record.location)
            .map(|location| index.classify_name(location)),
    )
}

/// Builds an aggregate from precomputed region assignments, one per
/// located record (`None` for records outside every region).
///
/// Every region in `index` appears in load order. Percentages are relative
/// to the number of assigned records and are all zero when nothing was
/// assigned.
#[must_use]
pub fn tally<'a>(
    index: &RegionIndex,
    assignments: impl IntoIterator<Item = Option<&'a str>>,
) -> RegionAggregate {
    let mut counts = vec![0_u64; index.len()];
    let mut unassigned = 0_u64;

    for assignment in assignments {
        let position = assignment
            .and_then(|name| index.regions().iter().position(|r| r.name == name));
        match position {
            Some(i) => counts[i] += 1,
            None => unassigned += 1,
        }
    }

    let total: u64 = counts.iter().sum();

    #[allow(clippy::cast_precision_loss)]
    let regions = index
        .regions()
        .iter()
        .zip(counts)
        .map(|(region, count)| RegionCount {
            name: region.name.clone(),
            count,
            percentage: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            },
        })
        .collect();

    RegionAggregate {
        regions,
        total,
        unassigned,
    }
}
