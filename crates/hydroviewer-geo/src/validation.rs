use crate::models::Boundary;
use hydroviewer_core::error::{HydroviewerError, Result};

/// Validation result with details
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
}

/// A problem found at a specific place in a boundary
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn add_error(&mut self, location: String, reason: impl Into<String>) {
        self.errors.push(ValidationIssue {
            location,
            reason: reason.into(),
        });
    }

    fn absorb(&mut self, prefix: &str, other: ValidationResult) {
        for issue in other.errors {
            self.add_error(format!("{}.{}", prefix, issue.location), issue.reason);
        }
    }
}

fn validate_ring(ring: &geo::LineString<f64>, location: &str) -> ValidationResult {
    let mut result = ValidationResult::default();

    if ring.0.len() < 4 {
        result.add_error(
            location.to_string(),
            format!("ring must have at least 4 points, found {}", ring.0.len()),
        );
    }

    if let (Some(first), Some(last)) = (ring.0.first(), ring.0.last()) {
        if first != last {
            result.add_error(location.to_string(), "ring must be closed");
        }
    }

    if let Some(i) = ring.0.iter().position(|c| !c.x.is_finite() || !c.y.is_finite()) {
        result.add_error(format!("{}[{}]", location, i), "coordinates must be finite");
    }

    result
}

/// Validate a polygon's rings
pub fn validate_polygon(polygon: &geo::Polygon<f64>) -> ValidationResult {
    let mut result = validate_ring(polygon.exterior(), "exterior");
    for (i, interior) in polygon.interiors().iter().enumerate() {
        let ring = validate_ring(interior, &format!("interior[{}]", i));
        result.errors.extend(ring.errors);
    }
    result
}

pub fn validate_multipolygon(multipolygon: &geo::MultiPolygon<f64>) -> ValidationResult {
    let mut result = ValidationResult::default();
    for (i, polygon) in multipolygon.0.iter().enumerate() {
        result.absorb(&format!("polygon[{}]", i), validate_polygon(polygon));
    }
    result
}

/// Validate every feature of a boundary, failing on the first broken one
pub fn validate_boundary(boundary: &Boundary) -> Result<()> {
    for (i, feature) in boundary.features.iter().enumerate() {
        let result = validate_multipolygon(&feature.geometry);
        if let Some(issue) = result.errors.first() {
            return Err(HydroviewerError::InvalidBoundary {
                reason: format!("feature {} {}: {}", i, issue.location, issue.reason),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoundaryFeature;
    use geo::{polygon, Coord, LineString, MultiPolygon, Polygon};
    use hydroviewer_core::models::Crs;

    #[test]
    fn test_valid_polygon() {
        let poly = polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ];
        assert!(validate_polygon(&poly).is_valid());
    }

    #[test]
    fn test_short_ring_is_invalid() {
        // closed on construction, leaving three points
        let ring = LineString::new(vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 0.0 }]);
        let poly = Polygon::new(ring, vec![]);
        let result = validate_polygon(&poly);
        assert!(!result.is_valid());
        assert!(result.errors[0].reason.contains("at least 4"));
    }

    #[test]
    fn test_non_finite_coordinate_is_reported() {
        let poly = polygon![
            (x: 0.0, y: 0.0),
            (x: f64::NAN, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 0.0),
        ];
        let boundary = Boundary::new(
            vec![BoundaryFeature::new(MultiPolygon::new(vec![poly]))],
            Crs::wgs84(),
        )
        .unwrap();

        let err = validate_boundary(&boundary).unwrap_err();
        match err {
            HydroviewerError::InvalidBoundary { reason } => {
                assert!(reason.contains("finite"));
                assert!(reason.contains("polygon[0]"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
