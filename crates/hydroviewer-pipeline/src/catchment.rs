//! Catchment selection
//!
//! Catchments are joined to the selected drainage lines by `COMID`, not by
//! geometry: every catchment whose identifier appears in the network
//! selection is kept.

use hydroviewer_core::config::AppContext;
use hydroviewer_core::error::{HydroviewerError, Result};
use hydroviewer_core::models::{ClipTarget, Crs, DatasetRole, ProjectDir, RegionName, COMID_FIELD};
use hydroviewer_store::shapefile_io::Layer;
use hydroviewer_store::GeometryStore;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::models::SelectionSummary;
use crate::network::write_selection;

/// Selects the catchments draining into a project's selected network
#[derive(Debug, Clone)]
pub struct CatchmentSelector {
    store: GeometryStore,
    planar_crs: Crs,
}

impl CatchmentSelector {
    pub fn new(store: GeometryStore, planar_crs: Crs) -> Self {
        Self { store, planar_crs }
    }

    pub fn from_context(ctx: &AppContext) -> Self {
        Self::new(GeometryStore::new(&ctx.shapefile_dir), ctx.planar_crs.clone())
    }

    /// Select and persist the catchments of `region` matching the network
    pub fn select(&self, project: &ProjectDir, region: &RegionName) -> Result<SelectionSummary> {
        let network_shp = require_network_selection(project)?;
        let network = Layer::read(&network_shp, &self.planar_crs)?;
        network.require_field(COMID_FIELD)?;
        let ids: HashSet<i64> = network.features.iter().filter_map(|f| f.id(COMID_FIELD)).collect();
        let missing = network.features.iter().filter(|f| f.id(COMID_FIELD).is_none()).count();
        if missing > 0 {
            tracing::warn!(
                project = %project.name,
                missing,
                "Some selected drainage lines have no usable COMID"
            );
        }

        let dataset = self.store.open(region, DatasetRole::Catchment)?;
        let layer = dataset.read_layer(&self.planar_crs)?;
        layer.require_field(COMID_FIELD)?;

        let mut skipped = 0;
        let mut indices = Vec::new();
        for (index, feature) in layer.features.iter().enumerate() {
            match feature.id(COMID_FIELD) {
                Some(id) if ids.contains(&id) => indices.push(index),
                Some(_) => {}
                None => skipped += 1,
            }
        }

        let selected = write_selection(project, ClipTarget::Catchment, &layer, &indices)?;

        tracing::info!(
            project = %project.name,
            region = %region,
            network = ids.len(),
            total = layer.features.len(),
            selected,
            "Selected catchments"
        );

        Ok(SelectionSummary {
            target: ClipTarget::Catchment,
            region: region.clone(),
            dataset: dataset.name().to_string(),
            total: layer.features.len(),
            selected,
            skipped,
        })
    }
}

/// Path of the project's drainage line selection, which catchment clipping
/// depends on
pub(crate) fn require_network_selection(project: &ProjectDir) -> Result<PathBuf> {
    let network_shp = project.selection_shp(ClipTarget::Drainageline);
    if !network_shp.exists() {
        return Err(HydroviewerError::prerequisite(
            format!("drainage line selection for project '{}'", project.name),
            "Clip the drainage lines before the catchments",
        ));
    }
    Ok(network_shp)
}
