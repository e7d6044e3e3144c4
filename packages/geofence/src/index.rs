//! In-memory R-tree of region polygons.

use engagement_map_activity_models::Location;
use geo::{BoundingRect, Intersects, MultiPolygon, Point};
use rstar::{AABB, RTree, RTreeObject};

/// A named region polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    /// Boundary in longitude/latitude order (WGS84).
    pub boundary: MultiPolygon<f64>,
}

impl Region {
    #[must_use]
    pub fn new(name: impl Into<String>, boundary: MultiPolygon<f64>) -> Self {
        Self {
            name: name.into(),
            boundary,
        }
    }

    /// Whether the point lies inside the region or on its boundary.
    #[must_use]
    pub fn covers(&self, location: Location) -> bool {
        self.boundary.intersects(&to_point(location))
    }
}

/// A region's position in load order plus its bounding box.
struct RegionEntry {
    order: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for RegionEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Regions in load order with an envelope index for candidate lookup.
///
/// Regions are expected to partition the study area. Where they do not
/// (overlaps, or a point on a shared edge), the region loaded first wins;
/// this is deterministic but not geometrically meaningful.
pub struct RegionIndex {
    regions: Vec<Region>,
    tree: RTree<RegionEntry>,
}

impl RegionIndex {
    #[must_use]
    pub fn new(regions: Vec<Region>) -> Self {
        let entries = regions
            .iter()
            .enumerate()
            .map(|(order, region)| RegionEntry {
                order,
                envelope: compute_envelope(&region.boundary),
            })
            .collect();

        Self {
            regions,
            tree: RTree::bulk_load(entries),
        }
    }

    /// Regions in load order.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Returns the first region, in load order, containing `location`.
    #[must_use]
    pub fn classify(&self, location: Location) -> Option<&Region> {
        let point = to_point(location);
        let query_env = AABB::from_point([point.x(), point.y()]);

        self.tree
            .locate_in_envelope_intersecting(&query_env)
            .filter(|entry| self.regions[entry.order].boundary.intersects(&point))
            .map(|entry| entry.order)
            .min()
            .map(|order| &self.regions[order])
    }

    /// Name of the region containing `location`, if any.
    #[must_use]
    pub fn classify_name(&self, location: Location) -> Option<&str> {
        self.classify(location).map(|r| r.name.as_str())
    }

    /// Whether any region contains `location`.
    #[must_use]
    pub fn covers(&self, location: Location) -> bool {
        self.classify(location).is_some()
    }
}

impl std::fmt::Debug for RegionIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionIndex")
            .field("regions", &self.regions.len())
            .finish_non_exhaustive()
    }
}

fn to_point(location: Location) -> Point<f64> {
    Point::new(location.longitude, location.latitude)
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}
