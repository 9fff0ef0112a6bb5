//! CRS transformation and normalization

use crate::models::{Boundary, BoundaryFeature};
use geo::{Coord, Geometry, MapCoords, MultiPolygon};
use hydroviewer_core::error::{HydroviewerError, Result};
use hydroviewer_core::models::Crs;
use proj::Proj;

/// Check if two CRS are the same
pub fn crs_match(crs1: &Crs, crs2: &Crs) -> bool {
    crs1.epsg == crs2.epsg
}

/// Reusable transformation between two reference systems
///
/// Building the PROJ pipeline is the expensive part, so a reprojector is
/// created once per dataset and applied to every feature.
pub struct Reprojector {
    from: Crs,
    to: Crs,
    // None when both sides are the same CRS
    proj: Option<Proj>,
}

impl Reprojector {
    /// Create a reprojector from `from` to `to`
    pub fn new(from: &Crs, to: &Crs) -> Result<Self> {
        let proj = if crs_match(from, to) {
            None
        } else {
            let proj = Proj::new_known_crs(&from.authority(), &to.authority(), None).map_err(
                |e| HydroviewerError::Projection {
                    from: from.epsg,
                    to: to.epsg,
                    reason: format!("Failed to create projection: {}", e),
                },
            )?;
            Some(proj)
        };

        Ok(Self {
            from: from.clone(),
            to: to.clone(),
            proj,
        })
    }

    pub fn target(&self) -> &Crs {
        &self.to
    }

    fn convert(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        match &self.proj {
            None => Ok(coord),
            Some(proj) => {
                let (x, y) = proj.convert((coord.x, coord.y)).map_err(|e| {
                    HydroviewerError::Projection {
                        from: self.from.epsg,
                        to: self.to.epsg,
                        reason: format!("Projection failed at ({}, {}): {}", coord.x, coord.y, e),
                    }
                })?;
                if !x.is_finite() || !y.is_finite() {
                    return Err(HydroviewerError::Projection {
                        from: self.from.epsg,
                        to: self.to.epsg,
                        reason: format!(
                            "Coordinate ({}, {}) is outside the projection",
                            coord.x, coord.y
                        ),
                    });
                }
                Ok(Coord { x, y })
            }
        }
    }

    /// Reproject any geometry
    pub fn geometry(&self, geometry: &Geometry<f64>) -> Result<Geometry<f64>> {
        geometry.try_map_coords(|c| self.convert(c))
    }

    pub fn multi_polygon(&self, geometry: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>> {
        geometry.try_map_coords(|c| self.convert(c))
    }

    /// Reproject every feature of a boundary, keeping properties
    pub fn boundary(&self, boundary: &Boundary) -> Result<Boundary> {
        if !crs_match(&boundary.crs, &self.from) {
            return Err(HydroviewerError::Projection {
                from: boundary.crs.epsg,
                to: self.to.epsg,
                reason: format!("Reprojector expects input in {}", self.from),
            });
        }

        let features = boundary
            .features
            .iter()
            .map(|feature| {
                Ok(BoundaryFeature {
                    geometry: self.multi_polygon(&feature.geometry)?,
                    properties: feature.properties.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Boundary {
            features,
            crs: self.to.clone(),
        })
    }
}

/// Reproject a boundary into `to`, a no-op when it is already there
pub fn reproject_boundary(boundary: &Boundary, to: &Crs) -> Result<Boundary> {
    if crs_match(&boundary.crs, to) {
        return Ok(boundary.clone());
    }
    Reprojector::new(&boundary.crs, to)?.boundary(boundary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Area};

    fn square_boundary() -> Boundary {
        let poly = polygon![
            (x: -100.0, y: 40.0),
            (x: -99.0, y: 40.0),
            (x: -99.0, y: 41.0),
            (x: -100.0, y: 41.0),
            (x: -100.0, y: 40.0),
        ];
        Boundary::new(vec![BoundaryFeature::new(MultiPolygon::new(vec![poly]))], Crs::wgs84())
            .unwrap()
    }

    #[test]
    fn test_same_crs_is_identity() {
        let boundary = square_boundary();
        let out = reproject_boundary(&boundary, &Crs::wgs84()).unwrap();
        assert_eq!(boundary, out);
    }

    #[test]
    fn test_web_mercator_known_point() {
        let reprojector = Reprojector::new(&Crs::wgs84(), &Crs::web_mercator()).unwrap();
        let point = Geometry::Point(geo::Point::new(180.0, 0.0));
        let Geometry::Point(projected) = reprojector.geometry(&point).unwrap() else {
            panic!("expected a point");
        };
        assert!((projected.x() - 20_037_508.342789244).abs() < 1e-3);
        assert!(projected.y().abs() < 1e-6);
    }

    #[test]
    fn test_round_trip_recovers_vertices() {
        let boundary = square_boundary();
        let planar = reproject_boundary(&boundary, &Crs::web_mercator()).unwrap();
        assert_eq!(planar.crs, Crs::web_mercator());
        assert!(planar.unsigned_area() > 1e9);

        let back = reproject_boundary(&planar, &Crs::wgs84()).unwrap();
        let original = boundary.first().geometry.0[0].exterior();
        let recovered = back.first().geometry.0[0].exterior();
        for (a, b) in original.coords().zip(recovered.coords()) {
            assert!((a.x - b.x).abs() < 1e-6);
            assert!((a.y - b.y).abs() < 1e-6);
        }
        assert!((boundary.first().geometry.unsigned_area() - back.unsigned_area()).abs() < 1e-9);
    }

    #[test]
    fn test_boundary_in_wrong_crs_is_rejected() {
        let reprojector = Reprojector::new(&Crs::web_mercator(), &Crs::wgs84()).unwrap();
        assert!(reprojector.boundary(&square_boundary()).is_err());
    }
}
