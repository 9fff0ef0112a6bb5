//! The two persisted copies of a project boundary.

use hydroviewer_core::error::{HydroviewerError, Result};
use hydroviewer_core::models::{Crs, ProjectDir, PROJECTED_DIR};
use hydroviewer_geo::models::{geometry_kind, polygonal_parts};
use hydroviewer_geo::{Boundary, BoundaryFeature};
use std::fs;

use crate::fs_util;
use crate::shapefile_io::{self, Layer};

/// Write the geographic copy, `boundaries.json`
pub fn write_geographic(project: &ProjectDir, boundary: &Boundary) -> Result<()> {
    let bytes = serde_json::to_vec(&boundary.to_geojson())?;
    fs_util::write_file_atomic(&project.boundaries_json(), &bytes)
}

/// Write the planar copy, replacing `projected_selections/` as a whole
pub fn write_planar(project: &ProjectDir, boundary: &Boundary) -> Result<()> {
    let dest = project.projected_dir();
    let staging = fs_util::staging_dir_for(&dest)?;
    shapefile_io::write_boundary(boundary, &staging.path().join(format!("{}.shp", PROJECTED_DIR)))?;
    fs_util::replace_dir(staging, &dest)
}

/// Read `boundaries.json` as text, for embedding in the viewer
pub fn read_geographic_text(project: &ProjectDir) -> Result<String> {
    let path = project.boundaries_json();
    if !path.exists() {
        return Err(missing_boundary(project));
    }
    Ok(fs::read_to_string(path)?)
}

pub fn read_geographic(project: &ProjectDir) -> Result<Boundary> {
    Boundary::from_geojson_str(&read_geographic_text(project)?)
}

/// Read the planar boundary written by the normalizer
pub fn read_planar(project: &ProjectDir, planar_crs: &Crs) -> Result<Boundary> {
    let path = project.projected_shp();
    if !path.exists() {
        return Err(missing_boundary(project));
    }
    boundary_from_layer(&Layer::read(&path, planar_crs)?)
}

/// Build a boundary from a polygon layer, carrying attributes as properties
pub fn boundary_from_layer(layer: &Layer) -> Result<Boundary> {
    let mut features = Vec::with_capacity(layer.features.len());
    for (idx, feature) in layer.features.iter().enumerate() {
        let Some(geometry) = feature.geometry() else {
            tracing::warn!(
                feature = idx,
                layer = %layer.name(),
                "Skipping feature without geometry"
            );
            continue;
        };
        let kind = geometry_kind(&geometry);
        let polygons = polygonal_parts(geometry).ok_or_else(|| HydroviewerError::InvalidBoundary {
            reason: format!(
                "Feature {} of {} is a {}, expected a polygon",
                idx,
                layer.name(),
                kind
            ),
        })?;
        features.push(BoundaryFeature {
            geometry: polygons,
            properties: feature.properties(),
        });
    }
    Boundary::new(features, layer.crs.clone())
}

fn missing_boundary(project: &ProjectDir) -> HydroviewerError {
    HydroviewerError::prerequisite(
        format!("boundary for project '{}'", project.name),
        "Set a boundary first (GeoJSON, atlas region, or shapefile upload)",
    )
}
