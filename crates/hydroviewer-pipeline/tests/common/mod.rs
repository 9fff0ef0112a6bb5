//! Fixture geometry store and project for pipeline tests
//!
//! All coordinates are EPSG:3857 meters.

#![allow(dead_code)]

use hydroviewer_core::config::{AppContext, LayeredConfig};
use hydroviewer_core::models::ProjectDir;
use hydroviewer_store::prj::WEB_MERCATOR_PRJ;
use hydroviewer_store::ProjectStore;
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, PolygonRing, Polyline};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

pub struct Fixture {
    pub root: TempDir,
    pub ctx: AppContext,
}

impl Fixture {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let mut config = LayeredConfig::with_defaults();
        config.workspace.value = root.path().to_path_buf();
        let ctx = config.to_context().unwrap();
        fs::create_dir_all(&ctx.shapefile_dir).unwrap();
        Self { root, ctx }
    }

    pub fn projects(&self) -> ProjectStore {
        ProjectStore::new(self.ctx.projects_dir())
    }

    pub fn project(&self, name: &str) -> ProjectDir {
        self.projects().create(name).unwrap()
    }

    /// Add a region whose boundary is the square `[min, max]²`
    pub fn add_region(&self, region: &str, min: f64, max: f64) {
        let name = format!("{}-boundary", region);
        self.bundle(&name, |path| {
            let builder = TableWriterBuilder::new()
                .add_numeric_field(FieldName::try_from("id").unwrap(), 10, 0);
            let mut writer = shapefile::Writer::from_path(path, builder).unwrap();
            let mut record = Record::default();
            record.insert("id".to_string(), FieldValue::Numeric(Some(1.0)));
            writer.write_shape_and_record(&square(min, max), &record).unwrap();
        });
    }

    /// Add a region's drainage lines, each `(id, vertices)`
    pub fn add_drainagelines(
        &self,
        region: &str,
        id_field: &str,
        lines: &[(i64, Vec<(f64, f64)>)],
    ) {
        let name = format!("{}-drainageline", region);
        self.bundle(&name, |path| {
            let builder = TableWriterBuilder::new()
                .add_numeric_field(FieldName::try_from(id_field).unwrap(), 10, 0)
                .add_character_field(FieldName::try_from("name").unwrap(), 20);
            let mut writer = shapefile::Writer::from_path(path, builder).unwrap();
            for (id, vertices) in lines {
                let line =
                    Polyline::new(vertices.iter().map(|(x, y)| Point::new(*x, *y)).collect());
                let mut record = Record::default();
                record.insert(id_field.to_string(), FieldValue::Numeric(Some(*id as f64)));
                record.insert(
                    "name".to_string(),
                    FieldValue::Character(Some(format!("river {}", id))),
                );
                writer.write_shape_and_record(&line, &record).unwrap();
            }
        });
    }

    /// Add a region's catchments: one 1 km square per id, anywhere
    pub fn add_catchments(&self, region: &str, ids: &[i64]) {
        let name = format!("{}-catchment", region);
        self.bundle(&name, |path| {
            let builder = TableWriterBuilder::new()
                .add_numeric_field(FieldName::try_from("COMID").unwrap(), 10, 0);
            let mut writer = shapefile::Writer::from_path(path, builder).unwrap();
            for (i, id) in ids.iter().enumerate() {
                let min = i as f64 * 1000.0;
                let mut record = Record::default();
                record.insert("COMID".to_string(), FieldValue::Numeric(Some(*id as f64)));
                writer.write_shape_and_record(&square(min, min + 1000.0), &record).unwrap();
            }
        });
    }

    /// Write a shapefile through `write` and zip it as `<name>.zip`
    fn bundle(&self, name: &str, write: impl FnOnce(&Path)) {
        let scratch = TempDir::new().unwrap();
        let shp = scratch.path().join(format!("{}.shp", name));
        write(&shp);
        fs::write(shp.with_extension("prj"), WEB_MERCATOR_PRJ).unwrap();

        let file = File::create(self.ctx.shapefile_dir.join(format!("{}.zip", name))).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        for ext in ["shp", "shx", "dbf", "prj"] {
            zip.start_file(format!("{}.{}", name, ext), zip::write::SimpleFileOptions::default())
                .unwrap();
            zip.write_all(&fs::read(shp.with_extension(ext)).unwrap()).unwrap();
        }
        zip.finish().unwrap();
    }
}

pub fn square(min: f64, max: f64) -> shapefile::Polygon {
    shapefile::Polygon::new(PolygonRing::Outer(vec![
        Point::new(min, min),
        Point::new(min, max),
        Point::new(max, max),
        Point::new(max, min),
        Point::new(min, min),
    ]))
}

/// GeoJSON for the planar square `[min, max]²`
pub fn planar_boundary(min: f64, max: f64) -> String {
    serde_json::json!({
        "type": "FeatureCollection",
        "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::3857" } },
        "features": [{
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[min, min], [max, min], [max, max], [min, max], [min, min]]]
            }
        }]
    })
    .to_string()
}
