//! Region resolution
//!
//! Finds the region whose boundary the project boundary falls in. Regions are
//! tried in the order the geometry store lists them and the first
//! intersecting one wins, so a boundary spanning two regions resolves to
//! whichever is listed first.

use hydroviewer_core::config::AppContext;
use hydroviewer_core::error::{HydroviewerError, Result};
use hydroviewer_core::models::{Crs, DatasetRole, ProjectDir, RegionName};
use hydroviewer_geo::spatial::intersects_any;
use hydroviewer_geo::Reprojector;
use hydroviewer_store::{boundary_files, GeometryStore};

/// Resolves a project boundary to a region of the geometry store
#[derive(Debug, Clone)]
pub struct RegionResolver {
    store: GeometryStore,
    planar_crs: Crs,
}

impl RegionResolver {
    pub fn new(store: GeometryStore, planar_crs: Crs) -> Self {
        Self { store, planar_crs }
    }

    pub fn from_context(ctx: &AppContext) -> Self {
        Self::new(GeometryStore::new(&ctx.shapefile_dir), ctx.planar_crs.clone())
    }

    /// First region whose boundary intersects the project boundary's first
    /// feature
    pub fn resolve(&self, project: &ProjectDir) -> Result<RegionName> {
        let boundary = boundary_files::read_planar(project, &self.planar_crs)?;
        let feature = &boundary.first().geometry;

        let regions = self.store.regions()?;
        tracing::debug!(project = %project.name, candidates = regions.len(), "Resolving region");

        for region in regions {
            let dataset = self.store.open(&region, DatasetRole::Boundary)?;
            let layer = dataset.read_layer(&self.planar_crs)?;

            let candidate = if layer.crs == boundary.crs {
                feature.clone()
            } else {
                Reprojector::new(&boundary.crs, &layer.crs)?.multi_polygon(feature)?
            };

            let geometries: Vec<_> = layer.geometries().into_iter().flatten().collect();
            if intersects_any(&candidate, &geometries) {
                tracing::info!(project = %project.name, region = %region, "Resolved region");
                return Ok(region);
            }
        }

        tracing::info!(project = %project.name, "No region intersects the project boundary");
        Err(HydroviewerError::NoRegionFound)
    }
}
