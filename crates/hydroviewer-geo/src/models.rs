//! Project boundary model and its GeoJSON interchange form.
//!
//! A boundary is one or more polygonal features in a known CRS. Every feature
//! is held as a `MultiPolygon` so single polygons and multi-part boundaries go
//! through the same code paths.

use geo::{Area, Geometry, MultiPolygon, Polygon};
use hydroviewer_core::error::{HydroviewerError, Result};
use hydroviewer_core::models::Crs;
use serde_json::{json, Map, Value};

/// One polygonal feature of a boundary and its properties
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub geometry: MultiPolygon<f64>,
    pub properties: Map<String, Value>,
}

impl BoundaryFeature {
    pub fn new(geometry: MultiPolygon<f64>) -> Self {
        Self {
            geometry,
            properties: Map::new(),
        }
    }
}

/// A project boundary in a single CRS
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub features: Vec<BoundaryFeature>,
    pub crs: Crs,
}

impl Boundary {
    /// Create a boundary, rejecting one without any polygon
    pub fn new(features: Vec<BoundaryFeature>, crs: Crs) -> Result<Self> {
        let features: Vec<_> =
            features.into_iter().filter(|f| !f.geometry.0.is_empty()).collect();
        if features.is_empty() {
            return Err(HydroviewerError::InvalidBoundary {
                reason: "boundary contains no polygon features".to_string(),
            });
        }
        Ok(Self { features, crs })
    }

    /// Parse GeoJSON text (FeatureCollection, Feature, or bare Geometry)
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let geojson: geojson::GeoJson =
            text.parse().map_err(|e| HydroviewerError::InvalidBoundary {
                reason: format!("Failed to parse GeoJSON: {}", e),
            })?;

        let (geometries, crs) = match geojson {
            geojson::GeoJson::FeatureCollection(fc) => {
                let crs = fc
                    .foreign_members
                    .as_ref()
                    .and_then(|fm| fm.get("crs"))
                    .and_then(extract_epsg_from_crs)
                    .unwrap_or(4326);
                let geometries = fc
                    .features
                    .into_iter()
                    .map(|feature| (feature.geometry, feature.properties.unwrap_or_default()))
                    .collect::<Vec<_>>();
                (geometries, crs)
            }
            geojson::GeoJson::Feature(feature) => {
                (vec![(feature.geometry, feature.properties.unwrap_or_default())], 4326)
            }
            geojson::GeoJson::Geometry(geometry) => (vec![(Some(geometry), Map::new())], 4326),
        };

        let mut features = Vec::with_capacity(geometries.len());
        for (idx, (geometry, properties)) in geometries.into_iter().enumerate() {
            let Some(geometry) = geometry else {
                tracing::warn!(feature = idx, "Skipping boundary feature without geometry");
                continue;
            };

            let geometry = Geometry::<f64>::try_from(geometry).map_err(|e| {
                HydroviewerError::InvalidBoundary {
                    reason: format!("Feature {} has an unreadable geometry: {}", idx, e),
                }
            })?;

            let kind = geometry_kind(&geometry);
            let polygons =
                polygonal_parts(geometry).ok_or_else(|| HydroviewerError::InvalidBoundary {
                    reason: format!("Feature {} is a {}, expected a polygon", idx, kind),
                })?;

            features.push(BoundaryFeature {
                geometry: polygons,
                properties,
            });
        }

        Self::new(features, Crs::from_epsg(crs))
    }

    /// Serialize as a GeoJSON FeatureCollection
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .features
            .iter()
            .map(|feature| {
                json!({
                    "type": "Feature",
                    "properties": Value::Object(feature.properties.clone()),
                    "geometry": multipolygon_to_geojson(&feature.geometry),
                })
            })
            .collect();

        let mut collection = json!({
            "type": "FeatureCollection",
            "features": features,
        });

        if !self.crs.is_geographic() {
            collection["crs"] = json!({
                "type": "name",
                "properties": { "name": format!("urn:ogc:def:crs:EPSG::{}", self.crs.epsg) },
            });
        }

        collection
    }

    /// The feature region resolution tests against
    pub fn first(&self) -> &BoundaryFeature {
        &self.features[0]
    }

    /// All polygons of all features, used as the clip region
    pub fn clip_region(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(
            self.features.iter().flat_map(|f| f.geometry.0.iter().cloned()).collect(),
        )
    }

    /// Planar area in squared CRS units
    pub fn unsigned_area(&self) -> f64 {
        self.features.iter().map(|f| f.geometry.unsigned_area()).sum()
    }
}

/// Polygonal content of a geometry, `None` for points and lines
pub fn polygonal_parts(geometry: Geometry<f64>) -> Option<MultiPolygon<f64>> {
    let polygons: Vec<Polygon<f64>> = match geometry {
        Geometry::Polygon(p) => vec![p],
        Geometry::MultiPolygon(mp) => mp.0,
        Geometry::Rect(r) => vec![r.to_polygon()],
        Geometry::Triangle(t) => vec![t.to_polygon()],
        Geometry::GeometryCollection(gc) => {
            gc.0.into_iter().filter_map(polygonal_parts).flat_map(|mp| mp.0).collect()
        }
        _ => return None,
    };

    if polygons.is_empty() {
        None
    } else {
        Some(MultiPolygon::new(polygons))
    }
}

/// Name of a geometry's type, for error messages
pub fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

fn polygon_rings(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    let mut rings = Vec::with_capacity(1 + polygon.interiors().len());
    rings.push(polygon.exterior().coords().map(|c| [c.x, c.y]).collect());
    for interior in polygon.interiors() {
        rings.push(interior.coords().map(|c| [c.x, c.y]).collect());
    }
    rings
}

fn multipolygon_to_geojson(geometry: &MultiPolygon<f64>) -> Value {
    if geometry.0.len() == 1 {
        json!({
            "type": "Polygon",
            "coordinates": polygon_rings(&geometry.0[0]),
        })
    } else {
        let coordinates: Vec<_> = geometry.0.iter().map(polygon_rings).collect();
        json!({
            "type": "MultiPolygon",
            "coordinates": coordinates,
        })
    }
}

/// Extract EPSG code from a legacy GeoJSON CRS object
fn extract_epsg_from_crs(crs: &Value) -> Option<u32> {
    let name = crs.get("properties")?.get("name")?.as_str()?;

    // "urn:ogc:def:crs:OGC:1.3:CRS84" is lon/lat WGS 84
    if name.ends_with("CRS84") {
        return Some(4326);
    }

    // Parse "EPSG:4326" or "urn:ogc:def:crs:EPSG::4326"
    name.split(':').next_back().and_then(|code| code.parse().ok())
}
