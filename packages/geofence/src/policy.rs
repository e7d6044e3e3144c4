//! Study-area policy: which located activities may appear on the map.

use engagement_map_activity_models::Location;
use engagement_map_geofence_models::BoundaryPolicyConfig;

use crate::GeofenceError;
use crate::boundaries::load_regions;
use crate::index::{Region, RegionIndex};

/// Region index plus the inside/outside policy applied to markers.
#[derive(Debug)]
pub struct Geofence {
    index: RegionIndex,
    outline: Option<Region>,
    require_inside: bool,
}

impl Geofence {
    #[must_use]
    pub const fn new(index: RegionIndex, outline: Option<Region>, require_inside: bool) -> Self {
        Self {
            index,
            outline,
            require_inside,
        }
    }

    /// Geofence that classifies against `index` but admits every record.
    #[must_use]
    pub const fn permissive(index: RegionIndex) -> Self {
        Self::new(index, None, false)
    }

    /// Builds a geofence from already-loaded regions, loading the optional
    /// outline named by `policy`.
    ///
    /// An outline source yielding several regions is merged into one.
    ///
    /// # Errors
    ///
    /// Returns [`GeofenceError`] if the outline cannot be loaded.
    pub async fn from_config(
        regions: Vec<Region>,
        policy: &BoundaryPolicyConfig,
    ) -> Result<Self, GeofenceError> {
        let outline = match &policy.outline {
            Some(source) => {
                let parts = load_regions(source).await?;
                let name = parts
                    .first()
                    .map(|r| r.name.clone())
                    .unwrap_or_default();
                let boundary = parts
                    .into_iter()
                    .flat_map(|r| r.boundary.0)
                    .collect::<Vec<_>>();
                Some(Region::new(name, geo::MultiPolygon(boundary)))
            }
            None => None,
        };

        Ok(Self::new(
            RegionIndex::new(regions),
            outline,
            policy.require_inside,
        ))
    }

    #[must_use]
    pub const fn index(&self) -> &RegionIndex {
        &self.index
    }

    #[must_use]
    pub const fn require_inside(&self) -> bool {
        self.require_inside
    }

    /// Name of the region containing `location`.
    #[must_use]
    pub fn classify(&self, location: Location) -> Option<&str> {
        self.index.classify_name(location)
    }

    /// Whether `location` lies inside the study area: the outline when one
    /// is configured, otherwise the union of the regions.
    #[must_use]
    pub fn inside_study_area(&self, location: Location) -> bool {
        self.outline.as_ref().map_or_else(
            || self.index.covers(location),
            |outline| outline.covers(location),
        )
    }

    /// Whether a record at `location` may be shown.
    ///
    /// Records without coordinates are always admitted; they are listed but
    /// never placed.
    #[must_use]
    pub fn admits(&self, location: Option<Location>) -> bool {
        match location {
            None => true,
            Some(_) if !self.require_inside => true,
            Some(loc) => self.inside_study_area(loc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::{at, square, west_east};

    #[test]
    fn permissive_admits_everything() {
        let fence = Geofence::permissive(west_east());
        assert!(fence.admits(Some(at(10.0, 10.0))));
        assert!(fence.admits(None));
    }

    #[test]
    fn require_inside_uses_region_union_without_outline() {
        let fence = Geofence::new(west_east(), None, true);
        assert!(fence.admits(Some(at(40.5, -74.5))));
        assert!(fence.admits(Some(at(40.5, -74.0))));
        assert!(!fence.admits(Some(at(39.0, -74.5))));
    }

    #[test]
    fn unlocated_records_are_never_dropped() {
        let fence = Geofence::new(west_east(), None, true);
        assert!(fence.admits(None));
    }

    #[test]
    fn outline_takes_precedence_over_regions() {
        let outline = square("State", -80.0, 38.0, -70.0, 45.0);
        let fence = Geofence::new(west_east(), Some(outline), true);

        let in_state_no_region = at(39.0, -74.5);
        assert!(fence.admits(Some(in_state_no_region)));
        assert_eq!(fence.classify(in_state_no_region), None);
        assert!(!fence.admits(Some(at(30.0, -74.5))));
    }

    #[tokio::test]
    async fn from_config_without_outline_keeps_policy() {
        let policy = BoundaryPolicyConfig {
            require_inside: true,
            outline: None,
        };
        let fence = Geofence::from_config(west_east().regions().to_vec(), &policy)
            .await
            .unwrap();
        assert!(fence.require_inside());
        assert_eq!(fence.index().len(), 2);
        assert_eq!(fence.classify(at(40.5, -73.5)), Some("East"));
    }
}
