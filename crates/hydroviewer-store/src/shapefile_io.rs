//! Shapefile reading and writing
//!
//! Shapefiles consist of multiple component files (.shp, .shx, .dbf, .prj).
//! Layers are read whole: the regional datasets are clipped in memory and
//! subsets are written back with the source attribute schema unchanged.

use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use hydroviewer_core::error::{HydroviewerError, Result};
use hydroviewer_core::models::Crs;
use hydroviewer_geo::Boundary;
use serde_json::{Map, Value};
use shapefile::dbase::{self, FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{PolygonRing, Shape};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::prj;

/// Extensions that make up a readable shapefile
pub const REQUIRED_COMPONENTS: [&str; 3] = ["shp", "shx", "dbf"];

/// One shape and its attribute row
pub struct LayerFeature {
    pub shape: Shape,
    pub record: Record,
}

impl LayerFeature {
    /// Geometry as a `geo` type, `None` for null shapes
    pub fn geometry(&self) -> Option<Geometry<f64>> {
        shape_to_geometry(&self.shape)
    }

    pub fn properties(&self) -> Map<String, Value> {
        self.record
            .clone()
            .into_iter()
            .map(|(name, value)| (name, convert_dbase_value(&value)))
            .collect()
    }

    /// Integer identifier stored in `field`
    ///
    /// Numeric fields must hold a whole number; character fields are parsed.
    pub fn id(&self, field: &str) -> Option<i64> {
        let whole = |v: f64| (v.fract() == 0.0 && v.is_finite()).then_some(v as i64);
        match self.record.get(field)? {
            FieldValue::Numeric(Some(n)) => whole(*n),
            FieldValue::Float(Some(f)) => whole(f64::from(*f)),
            FieldValue::Double(d) => whole(*d),
            FieldValue::Integer(i) => Some(i64::from(*i)),
            FieldValue::Character(Some(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// A shapefile loaded into memory
pub struct Layer {
    pub path: PathBuf,
    pub crs: Crs,
    /// Attribute field names in table order
    pub fields: Vec<String>,
    pub features: Vec<LayerFeature>,
}

impl Layer {
    /// Read a shapefile, assuming `default_crs` when there is no `.prj`
    pub fn read(path: &Path, default_crs: &Crs) -> Result<Self> {
        verify_components(path)?;

        let crs = read_crs(path, default_crs)?;

        let table = dbase::Reader::from_path(path.with_extension("dbf"))
            .map_err(|e| shapefile_error(path, format!("Failed to open attribute table: {}", e)))?;
        let fields = table.fields().iter().map(|f| f.name().to_string()).collect();

        let mut reader = shapefile::Reader::from_path(path)
            .map_err(|e| shapefile_error(path, format!("Failed to open Shapefile: {}", e)))?;

        let mut features = Vec::new();
        for result in reader.iter_shapes_and_records() {
            let (shape, record) = result
                .map_err(|e| shapefile_error(path, format!("Failed to read feature: {}", e)))?;
            features.push(LayerFeature { shape, record });
        }

        tracing::debug!(
            path = %path.display(),
            features = features.len(),
            crs = %crs,
            "Read shapefile"
        );

        Ok(Self {
            path: path.to_path_buf(),
            crs,
            fields,
            features,
        })
    }

    /// Dataset name, the file stem
    pub fn name(&self) -> String {
        self.path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Fail with `InvalidDataset` unless the table has `field`
    pub fn require_field(&self, field: &str) -> Result<()> {
        if self.has_field(field) {
            Ok(())
        } else {
            Err(HydroviewerError::InvalidDataset {
                name: self.name(),
                reason: format!("attribute table has no '{}' field", field),
            })
        }
    }

    pub fn geometries(&self) -> Vec<Option<Geometry<f64>>> {
        self.features.iter().map(LayerFeature::geometry).collect()
    }

    /// Write the features at `indices` to `dest`, keeping this layer's
    /// attribute schema and projection file
    ///
    /// Returns the number of features written. Null shapes are skipped.
    pub fn write_subset(&self, indices: &[usize], dest: &Path) -> Result<usize> {
        let table = dbase::Reader::from_path(self.path.with_extension("dbf")).map_err(|e| {
            shapefile_error(&self.path, format!("Failed to open attribute table: {}", e))
        })?;
        let builder = TableWriterBuilder::from_reader(table);

        let mut written = 0;
        {
            let mut writer = shapefile::Writer::from_path(dest, builder)
                .map_err(|e| shapefile_error(dest, format!("Failed to create Shapefile: {}", e)))?;

            for &index in indices {
                let Some(feature) = self.features.get(index) else {
                    continue;
                };
                let wrote = write_feature(&mut writer, &feature.shape, &feature.record)
                    .map_err(|e| {
                        shapefile_error(dest, format!("Failed to write feature {}: {}", index, e))
                    })?;
                if wrote {
                    written += 1;
                }
            }
        }

        let source_prj = self.path.with_extension("prj");
        if source_prj.exists() {
            fs::copy(&source_prj, dest.with_extension("prj"))?;
        } else if let Some(text) = prj::prj_for(&self.crs) {
            fs::write(dest.with_extension("prj"), text)?;
        }

        Ok(written)
    }
}

/// Write a boundary as a polygon shapefile with a single numeric `id` field
pub fn write_boundary(boundary: &Boundary, dest: &Path) -> Result<()> {
    let id_field = FieldName::try_from("id")
        .map_err(|e| shapefile_error(dest, format!("Invalid field name: {:?}", e)))?;
    let builder = TableWriterBuilder::new().add_numeric_field(id_field, 10, 0);

    {
        let mut writer = shapefile::Writer::from_path(dest, builder)
            .map_err(|e| shapefile_error(dest, format!("Failed to create Shapefile: {}", e)))?;

        for (i, feature) in boundary.features.iter().enumerate() {
            let shape = multipolygon_to_shape(&feature.geometry);
            let mut record = Record::default();
            record.insert("id".to_string(), FieldValue::Numeric(Some(i as f64)));
            writer
                .write_shape_and_record(&shape, &record)
                .map_err(|e| {
                    shapefile_error(dest, format!("Failed to write feature {}: {}", i, e))
                })?;
        }
    }

    if let Some(text) = prj::prj_for(&boundary.crs) {
        fs::write(dest.with_extension("prj"), text)?;
    }

    Ok(())
}

/// Verify that all required shapefile component files exist
pub fn verify_components(path: &Path) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COMPONENTS
        .iter()
        .filter(|ext| !path.with_extension(ext).exists())
        .map(|ext| format!(".{}", ext))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(shapefile_error(
            path,
            format!("Missing required component files: {}", missing.join(", ")),
        ))
    }
}

/// CRS from the `.prj` next to `path`
fn read_crs(path: &Path, default_crs: &Crs) -> Result<Crs> {
    let prj_path = path.with_extension("prj");
    if !prj_path.exists() {
        tracing::debug!(
            path = %path.display(),
            default = %default_crs,
            "No .prj file, assuming default CRS"
        );
        return Ok(default_crs.clone());
    }

    let text = fs::read_to_string(&prj_path)?;
    prj::detect_crs(&text)
        .ok_or_else(|| shapefile_error(path, "Unrecognized projection in .prj file".to_string()))
}

fn shapefile_error(path: &Path, message: String) -> HydroviewerError {
    HydroviewerError::Shapefile {
        path: path.to_path_buf(),
        message,
    }
}

fn write_feature(
    writer: &mut shapefile::Writer<BufWriter<File>>,
    shape: &Shape,
    record: &Record,
) -> std::result::Result<bool, shapefile::Error> {
    match shape {
        Shape::Point(s) => writer.write_shape_and_record(s, record)?,
        Shape::PointM(s) => writer.write_shape_and_record(s, record)?,
        Shape::PointZ(s) => writer.write_shape_and_record(s, record)?,
        Shape::Polyline(s) => writer.write_shape_and_record(s, record)?,
        Shape::PolylineM(s) => writer.write_shape_and_record(s, record)?,
        Shape::PolylineZ(s) => writer.write_shape_and_record(s, record)?,
        Shape::Polygon(s) => writer.write_shape_and_record(s, record)?,
        Shape::PolygonM(s) => writer.write_shape_and_record(s, record)?,
        Shape::PolygonZ(s) => writer.write_shape_and_record(s, record)?,
        Shape::Multipoint(s) => writer.write_shape_and_record(s, record)?,
        Shape::MultipointM(s) => writer.write_shape_and_record(s, record)?,
        Shape::MultipointZ(s) => writer.write_shape_and_record(s, record)?,
        Shape::Multipatch(s) => writer.write_shape_and_record(s, record)?,
        Shape::NullShape => {
            tracing::warn!("Skipping feature with null geometry");
            return Ok(false);
        }
    }
    Ok(true)
}

macro_rules! coords {
    ($points:expr) => {
        $points.iter().map(|p| Coord { x: p.x, y: p.y }).collect::<Vec<_>>()
    };
}

macro_rules! rings {
    ($polygon:expr) => {
        $polygon
            .rings()
            .iter()
            .map(|ring| match ring {
                PolygonRing::Outer(points) => (true, coords!(points)),
                PolygonRing::Inner(points) => (false, coords!(points)),
            })
            .collect::<Vec<_>>()
    };
}

/// Convert a shapefile shape into a `geo` geometry
pub fn shape_to_geometry(shape: &Shape) -> Option<Geometry<f64>> {
    match shape {
        Shape::Point(p) => Some(Geometry::Point(Point::new(p.x, p.y))),
        Shape::PointM(p) => Some(Geometry::Point(Point::new(p.x, p.y))),
        Shape::PointZ(p) => Some(Geometry::Point(Point::new(p.x, p.y))),
        Shape::Polyline(l) => lines(l.parts().iter().map(|part| coords!(part)).collect()),
        Shape::PolylineM(l) => lines(l.parts().iter().map(|part| coords!(part)).collect()),
        Shape::PolylineZ(l) => lines(l.parts().iter().map(|part| coords!(part)).collect()),
        Shape::Polygon(p) => polygons(rings!(p)),
        Shape::PolygonM(p) => polygons(rings!(p)),
        Shape::PolygonZ(p) => polygons(rings!(p)),
        Shape::Multipoint(mp) => points(coords!(mp.points())),
        Shape::MultipointM(mp) => points(coords!(mp.points())),
        Shape::MultipointZ(mp) => points(coords!(mp.points())),
        Shape::Multipatch(_) | Shape::NullShape => None,
    }
}

fn lines(parts: Vec<Vec<Coord<f64>>>) -> Option<Geometry<f64>> {
    let mut parts: Vec<LineString<f64>> =
        parts.into_iter().filter(|p| !p.is_empty()).map(LineString::new).collect();
    match parts.len() {
        0 => None,
        1 => parts.pop().map(Geometry::LineString),
        _ => Some(Geometry::MultiLineString(MultiLineString::new(parts))),
    }
}

fn points(coords: Vec<Coord<f64>>) -> Option<Geometry<f64>> {
    if coords.is_empty() {
        return None;
    }
    Some(Geometry::MultiPoint(MultiPoint::new(coords.into_iter().map(Point::from).collect())))
}

/// Assemble polygons from rings: each outer ring starts a polygon and inner
/// rings attach to the most recent one
fn polygons(rings: Vec<(bool, Vec<Coord<f64>>)>) -> Option<Geometry<f64>> {
    let mut built: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();
    for (outer, coords) in rings {
        let ring = LineString::new(coords);
        match built.last_mut() {
            Some((_, holes)) if !outer => holes.push(ring),
            _ => built.push((ring, Vec::new())),
        }
    }

    let mut polygons: Vec<Polygon<f64>> =
        built.into_iter().map(|(exterior, holes)| Polygon::new(exterior, holes)).collect();
    match polygons.len() {
        0 => None,
        1 => polygons.pop().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(MultiPolygon::new(polygons))),
    }
}

fn multipolygon_to_shape(geometry: &MultiPolygon<f64>) -> shapefile::Polygon {
    let to_points = |ring: &LineString<f64>| -> Vec<shapefile::Point> {
        ring.coords().map(|c| shapefile::Point::new(c.x, c.y)).collect()
    };

    let mut rings = Vec::new();
    for polygon in &geometry.0 {
        rings.push(PolygonRing::Outer(to_points(polygon.exterior())));
        for interior in polygon.interiors() {
            rings.push(PolygonRing::Inner(to_points(interior)));
        }
    }
    shapefile::Polygon::with_rings(rings)
}

/// Convert dBase field value to JSON value
fn convert_dbase_value(value: &FieldValue) -> Value {
    let number = |n: f64| serde_json::Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null);
    match value {
        FieldValue::Character(Some(s)) => Value::String(s.clone()),
        FieldValue::Numeric(Some(n)) => number(*n),
        FieldValue::Logical(Some(b)) => Value::Bool(*b),
        FieldValue::Date(Some(date)) => {
            Value::String(format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day()))
        }
        FieldValue::Float(Some(f)) => number(f64::from(*f)),
        FieldValue::Integer(i) => Value::Number((*i).into()),
        FieldValue::Currency(c) => number(*c),
        FieldValue::DateTime(dt) => Value::String(format!(
            "{:04}-{:02}-{:02}",
            dt.date().year(),
            dt.date().month(),
            dt.date().day()
        )),
        FieldValue::Double(d) => number(*d),
        FieldValue::Memo(s) => Value::String(s.clone()),
        FieldValue::Character(None)
        | FieldValue::Numeric(None)
        | FieldValue::Logical(None)
        | FieldValue::Date(None)
        | FieldValue::Float(None) => Value::Null,
    }
}
