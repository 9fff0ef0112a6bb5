//! Drainage-line selection
//!
//! A line belongs to the project when its representative point lies inside
//! the project boundary. Lines crossing the boundary are therefore either
//! wholly in or wholly out, never cut.

use hydroviewer_core::config::AppContext;
use hydroviewer_core::error::Result;
use hydroviewer_core::models::project::selection_layout;
use hydroviewer_core::models::{ClipTarget, Crs, DatasetRole, ProjectDir, RegionName, COMID_FIELD};
use hydroviewer_geo::spatial::select_by_representative_point;
use hydroviewer_geo::transform::reproject_boundary;
use hydroviewer_store::shapefile_io::Layer;
use hydroviewer_store::{boundary_files, fs_util, GeometryStore};

use crate::models::SelectionSummary;

/// Clips a region's drainage lines to the project boundary
#[derive(Debug, Clone)]
pub struct NetworkSelector {
    store: GeometryStore,
    planar_crs: Crs,
}

impl NetworkSelector {
    pub fn new(store: GeometryStore, planar_crs: Crs) -> Self {
        Self { store, planar_crs }
    }

    pub fn from_context(ctx: &AppContext) -> Self {
        Self::new(GeometryStore::new(&ctx.shapefile_dir), ctx.planar_crs.clone())
    }

    /// Select and persist the drainage lines of `region` inside the project
    pub fn select(&self, project: &ProjectDir, region: &RegionName) -> Result<SelectionSummary> {
        let boundary = boundary_files::read_planar(project, &self.planar_crs)?;

        let dataset = self.store.open(region, DatasetRole::Drainageline)?;
        let layer = dataset.read_layer(&self.planar_crs)?;
        layer.require_field(COMID_FIELD)?;

        let clip_region = reproject_boundary(&boundary, &layer.crs)?.clip_region();
        let selection = select_by_representative_point(&layer.geometries(), &clip_region);

        let selected =
            write_selection(project, ClipTarget::Drainageline, &layer, &selection.selected)?;

        tracing::info!(
            project = %project.name,
            region = %region,
            total = layer.features.len(),
            selected,
            skipped = selection.skipped,
            "Selected drainage lines"
        );

        Ok(SelectionSummary {
            target: ClipTarget::Drainageline,
            region: region.clone(),
            dataset: dataset.name().to_string(),
            total: layer.features.len(),
            selected,
            skipped: selection.skipped,
        })
    }
}

/// Write a subset of `layer` as the project's selection for `target`,
/// replacing any previous selection
pub(crate) fn write_selection(
    project: &ProjectDir,
    target: ClipTarget,
    layer: &Layer,
    indices: &[usize],
) -> Result<usize> {
    let dest = project.selection_dir(target);
    let staging = fs_util::staging_dir_for(&dest)?;

    let (_, stem) = selection_layout(target);
    let written = layer.write_subset(indices, &staging.path().join(format!("{}.shp", stem)))?;

    fs_util::replace_dir(staging, &dest)?;
    Ok(written)
}
