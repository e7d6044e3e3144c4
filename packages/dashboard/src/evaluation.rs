//! One filter-and-geofence pass over a dataset snapshot.

use engagement_map_activity::dataset::Dataset;
use engagement_map_activity_models::{ActivityRecord, Location};
use engagement_map_filter::filter_records;
use engagement_map_filter_models::FilterSelection;
use engagement_map_geofence::{Geofence, tally};
use engagement_map_geofence_models::RegionAggregate;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde::Serialize;

/// A matching activity with the region its true location falls in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedActivity {
    pub record: ActivityRecord,
    /// `None` when the activity has no location or lies outside every
    /// region.
    pub region: Option<String>,
}

/// An activity with a marker position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedActivity {
    pub record: ActivityRecord,
    /// Jittered marker position.
    pub position: Location,
    /// Region containing the true location.
    pub region: Option<String>,
}

/// Result of evaluating a [`FilterSelection`] against one dataset version.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// Dataset version the result was computed from.
    pub version: u64,
    /// Every matching record, located or not, in dataset order.
    pub listed: Vec<ListedActivity>,
    /// Matching records with coordinates, in dataset order.
    pub placed: Vec<PlacedActivity>,
    pub aggregate: RegionAggregate,
}

impl Evaluation {
    /// Filters `dataset` by `selection`, applies the geofence policy, and
    /// classifies every surviving located record.
    #[must_use]
    pub fn run(dataset: &Dataset, geofence: &Geofence, selection: &FilterSelection) -> Self {
        let matched = filter_records(dataset.records(), selection);
        let before_policy = matched.len();

        let admitted: Vec<&ActivityRecord> = matched
            .into_iter()
            .filter(|record| geofence.admits(record.location))
            .collect();

        if admitted.len() < before_policy {
            log::debug!(
                "Dropped {} activities outside the study area",
                before_policy - admitted.len()
            );
        }

        let mut listed = Vec::with_capacity(admitted.len());
        let mut placed = Vec::new();
        let mut assignments = Vec::new();

        for record in admitted {
            let region = record.location.map(|location| geofence.classify(location));
            if let Some(region) = region {
                assignments.push(region);
            }
            let region = region.flatten().map(str::to_string);

            if let Some(position) = record.jittered_location {
                placed.push(PlacedActivity {
                    record: record.clone(),
                    position,
                    region: region.clone(),
                });
            }

            listed.push(ListedActivity {
                record: record.clone(),
                region,
            });
        }

        let aggregate = tally(geofence.index(), assignments);

        log::debug!(
            "Evaluation on v{}: {} listed, {} placed, {} in regions",
            dataset.version(),
            listed.len(),
            placed.len(),
            aggregate.total
        );

        Self {
            version: dataset.version(),
            listed,
            placed,
            aggregate,
        }
    }

    /// Marker layer for the rendering collaborator: one `Point` feature per
    /// placed activity, at its jittered position, carrying the display
    /// fields and the assigned region.
    #[must_use]
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self.placed.iter().map(marker_feature).collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

fn marker_feature(placed: &PlacedActivity) -> Feature {
    let mut properties = match serde_json::to_value(&placed.record) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => JsonObject::new(),
    };
    properties.remove("location");
    properties.remove("jitteredLocation");
    properties.insert(
        "region".to_string(),
        placed
            .region
            .clone()
            .map_or(serde_json::Value::Null, serde_json::Value::String),
    );
    if let Some(contact) = placed.record.contact_link()
        && let Ok(value) = serde_json::to_value(contact)
    {
        properties.insert("contact".to_string(), value);
    }

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::Point(vec![
            placed.position.longitude,
            placed.position.latitude,
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
