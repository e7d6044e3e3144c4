//! Loads region polygons from a `GeoJSON` `FeatureCollection`.
//!
//! Uses the source's name property and optional property filter to turn
//! each feature into a [`Region`], regardless of the publisher's field
//! naming. Coordinates are expected in RFC 7946 order (longitude,
//! latitude; WGS84).

use std::collections::BTreeMap;
use std::path::Path;

use engagement_map_geofence_models::{BoundaryLocation, BoundarySource, PropertyFilter};
use geo::MultiPolygon;
use geojson::{Feature, GeoJson};

use crate::GeofenceError;
use crate::index::Region;

/// Reads and parses the regions described by `source`.
///
/// # Errors
///
/// Returns [`GeofenceError`] if the source cannot be read, is not valid
/// `GeoJSON`, or yields no regions.
pub async fn load_regions(source: &BoundarySource) -> Result<Vec<Region>, GeofenceError> {
    let body = match &source.source {
        BoundaryLocation::File { path } => read_file(Path::new(path))?,
        BoundaryLocation::Url { url } => fetch_url(url).await?,
    };

    let regions = parse_regions(&body, source)?;
    log::info!("Loaded {} regions from {}", regions.len(), source.source);
    Ok(regions)
}

fn read_file(path: &Path) -> Result<String, GeofenceError> {
    log::info!("Reading boundaries from {}", path.display());
    Ok(std::fs::read_to_string(path)?)
}

async fn fetch_url(url: &str) -> Result<String, GeofenceError> {
    log::info!("Downloading boundaries from {url}");
    let response = reqwest::get(url).await?.error_for_status()?;
    let body = response.text().await?;
    log::debug!("Downloaded {} bytes from {url}", body.len());
    Ok(body)
}

/// Parses a `GeoJSON` document into regions.
///
/// Features without a name or without polygonal geometry are skipped with
/// a warning. Features sharing a name are merged into one region, kept at
/// the position of the first occurrence.
///
/// # Errors
///
/// Returns [`GeofenceError::GeoJson`] for malformed documents and
/// [`GeofenceError::NoRegions`] if nothing usable remains.
pub fn parse_regions(body: &str, source: &BoundarySource) -> Result<Vec<Region>, GeofenceError> {
    let geojson: GeoJson = body.parse()?;

    let features = match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => Vec::new(),
    };

    let mut regions: Vec<Region> = Vec::new();
    let mut by_name: BTreeMap<String, usize> = BTreeMap::new();

    for feature in &features {
        if let Some(filter) = &source.filter
            && !passes_filter(feature, filter)
        {
            continue;
        }

        let Some(name) = feature_name(feature, &source.name_property) else {
            log::warn!(
                "Skipping boundary feature without a '{}' property",
                source.name_property
            );
            continue;
        };

        let Some(boundary) = feature_polygons(feature) else {
            log::warn!("Skipping boundary '{name}': missing or non-polygonal geometry");
            continue;
        };

        if let Some(&idx) = by_name.get(&name) {
            log::debug!("Merging additional geometry into region '{name}'");
            regions[idx].boundary.0.extend(boundary.0);
        } else {
            by_name.insert(name.clone(), regions.len());
            regions.push(Region::new(name, boundary));
        }
    }

    if regions.is_empty() {
        return Err(GeofenceError::NoRegions {
            source_name: source.source.to_string(),
        });
    }

    Ok(regions)
}

/// Reads a property as trimmed text. Numbers are accepted as their JSON
/// text.
fn property_text(feature: &Feature, property: &str) -> Option<String> {
    let value = feature.property(property)?;
    let text = match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn feature_name(feature: &Feature, name_property: &str) -> Option<String> {
    property_text(feature, name_property)
}

fn passes_filter(feature: &Feature, filter: &PropertyFilter) -> bool {
    property_text(feature, &filter.property).is_some_and(|v| v == filter.equals)
}

/// Converts a feature's geometry into a [`MultiPolygon`]. Handles both
/// `Polygon` and `MultiPolygon` geometry types.
fn feature_polygons(feature: &Feature) -> Option<MultiPolygon<f64>> {
    let geometry = feature.geometry.clone()?;
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use engagement_map_geofence_models::DEFAULT_NAME_PROPERTY;

    use super::*;
    use crate::index::tests::at;

    fn source(filter: Option<PropertyFilter>) -> BoundarySource {
        BoundarySource {
            source: BoundaryLocation::File {
                path: "counties.geojson".to_string(),
            },
            name_property: DEFAULT_NAME_PROPERTY.to_string(),
            filter,
        }
    }

    fn square_feature(name: &str, state: serde_json::Value, x0: f64, y0: f64) -> serde_json::Value {
        serde_json::json!({
            "type": "Feature",
            "properties": { "NAME": name, "STATE": state },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[x0, y0], [x0 + 1.0, y0], [x0 + 1.0, y0 + 1.0], [x0, y0 + 1.0], [x0, y0]]]
            }
        })
    }

    fn collection(features: Vec<serde_json::Value>) -> String {
        serde_json::json!({ "type": "FeatureCollection", "features": features }).to_string()
    }

    #[test]
    fn parses_named_polygons_in_order() {
        let body = collection(vec![
            square_feature("Middlesex", "34".into(), -75.0, 40.0),
            square_feature("Somerset", "34".into(), -74.0, 40.0),
        ]);
        let regions = parse_regions(&body, &source(None)).unwrap();

        let names: Vec<&str> = regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Middlesex", "Somerset"]);
        assert!(regions[0].covers(at(40.5, -74.5)));
    }

    #[test]
    fn filters_by_property_including_numeric_values() {
        let body = collection(vec![
            square_feature("Middlesex", "34".into(), -75.0, 40.0),
            square_feature("Kings", "36".into(), -74.0, 40.0),
            square_feature("Mercer", 34.into(), -76.0, 40.0),
        ]);
        let filter = PropertyFilter {
            property: "STATE".to_string(),
            equals: "34".to_string(),
        };
        let regions = parse_regions(&body, &source(Some(filter))).unwrap();

        let names: Vec<&str> = regions.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Middlesex", "Mercer"]);
    }

    #[test]
    fn skips_unnamed_and_point_features() {
        let body = collection(vec![
            serde_json::json!({
                "type": "Feature",
                "properties": { "NAME": "Pin" },
                "geometry": { "type": "Point", "coordinates": [-74.0, 40.0] }
            }),
            serde_json::json!({
                "type": "Feature",
                "properties": {},
                "geometry": null
            }),
            square_feature("Middlesex", "34".into(), -75.0, 40.0),
        ]);
        let regions = parse_regions(&body, &source(None)).unwrap();
        assert_eq!(regions.len(), 1);
    }

    #[test]
    fn merges_features_sharing_a_name() {
        let body = collection(vec![
            square_feature("Cape May", "34".into(), -75.0, 38.0),
            square_feature("Atlantic", "34".into(), -75.0, 39.0),
            square_feature("Cape May", "34".into(), -74.0, 38.0),
        ]);
        let regions = parse_regions(&body, &source(None)).unwrap();

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].name, "Cape May");
        assert_eq!(regions[0].boundary.0.len(), 2);
        assert!(regions[0].covers(at(38.5, -73.5)));
    }

    #[test]
    fn empty_result_is_an_error_not_zero_regions() {
        let body = collection(vec![square_feature("Kings", "36".into(), -74.0, 40.0)]);
        let filter = PropertyFilter {
            property: "STATE".to_string(),
            equals: "34".to_string(),
        };
        assert!(matches!(
            parse_regions(&body, &source(Some(filter))),
            Err(GeofenceError::NoRegions { .. })
        ));
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(
            parse_regions("{ not json", &source(None)),
            Err(GeofenceError::GeoJson(_))
        ));
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let source = BoundarySource {
            source: BoundaryLocation::File {
                path: "/nonexistent/boundaries.geojson".to_string(),
            },
            name_property: DEFAULT_NAME_PROPERTY.to_string(),
            filter: None,
        };
        assert!(matches!(
            load_regions(&source).await,
            Err(GeofenceError::Io(_))
        ));
    }
}
