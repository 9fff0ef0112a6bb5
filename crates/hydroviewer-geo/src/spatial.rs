//! Spatial predicates used by region resolution and network selection.

use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::interior_point::InteriorPoint;
use geo::algorithm::intersects::Intersects;
use geo::{Geometry, MultiPolygon, Point};
use rstar::{RTree, RTreeObject, AABB};

/// Representative point of a feature: a point guaranteed to lie on it
///
/// For lines this is a vertex, which keeps the membership test against the
/// line exact. Returns `None` for empty geometries.
pub fn representative_point(geometry: &Geometry<f64>) -> Option<Point<f64>> {
    geometry.interior_point()
}

/// Whether `feature` intersects any of `others`
pub fn intersects_any(feature: &MultiPolygon<f64>, others: &[Geometry<f64>]) -> bool {
    others.iter().any(|other| feature.intersects(other))
}

/// Point tagged with the index of the feature it represents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedPoint {
    pub index: usize,
    pub point: Point<f64>,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.point.x(), self.point.y()])
    }
}

/// Clip points to a polygon region, returning the surviving points
///
/// Points on the region's edge are kept. The R-tree narrows candidates to
/// the region's bounding box before the exact test.
pub fn clip_points(points: Vec<IndexedPoint>, region: &MultiPolygon<f64>) -> Vec<IndexedPoint> {
    let Some(rect) = region.bounding_rect() else {
        return Vec::new();
    };

    let tree = RTree::bulk_load(points);
    let envelope = AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]);

    let mut clipped: Vec<IndexedPoint> = tree
        .locate_in_envelope(&envelope)
        .filter(|candidate| region.intersects(&candidate.point))
        .copied()
        .collect();
    clipped.sort_by_key(|p| p.index);
    clipped
}

/// Outcome of a representative-point selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSelection {
    /// Indices of selected features, ascending
    pub selected: Vec<usize>,
    /// Features with no representative point (empty or null geometry)
    pub skipped: usize,
}

/// Select features whose representative point falls inside `region`
///
/// Each clipped point must still lie on its own feature; this drops points
/// the clip moved or duplicated instead of trusting the clip alone.
pub fn select_by_representative_point(
    features: &[Option<Geometry<f64>>],
    region: &MultiPolygon<f64>,
) -> PointSelection {
    let mut skipped = 0;
    let points: Vec<IndexedPoint> = features
        .iter()
        .enumerate()
        .filter_map(|(index, geometry)| {
            let point = geometry.as_ref().and_then(representative_point);
            if point.is_none() {
                skipped += 1;
            }
            point.map(|point| IndexedPoint { index, point })
        })
        .collect();

    let selected = clip_points(points, region)
        .into_iter()
        .filter(|p| {
            features[p.index].as_ref().map(|line| line.intersects(&p.point)).unwrap_or(false)
        })
        .map(|p| p.index)
        .collect();

    PointSelection { selected, skipped }
}
