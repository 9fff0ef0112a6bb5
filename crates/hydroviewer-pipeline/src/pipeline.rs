use hydroviewer_core::config::AppContext;
use hydroviewer_core::error::Result;
use hydroviewer_core::models::{ClipTarget, ProjectDir, RegionName};
use hydroviewer_store::GeometryStore;

use crate::catchment::{require_network_selection, CatchmentSelector};
use crate::models::{ClipReport, SelectionSummary};
use crate::network::NetworkSelector;
use crate::resolver::RegionResolver;

/// Clip pipeline: resolve the region, then select drainage lines, then
/// catchments
#[derive(Debug, Clone)]
pub struct ClipPipeline {
    resolver: RegionResolver,
    network: NetworkSelector,
    catchments: CatchmentSelector,
}

impl ClipPipeline {
    pub fn new(ctx: &AppContext) -> Self {
        let store = GeometryStore::new(&ctx.shapefile_dir);
        Self {
            resolver: RegionResolver::new(store.clone(), ctx.planar_crs.clone()),
            network: NetworkSelector::new(store.clone(), ctx.planar_crs.clone()),
            catchments: CatchmentSelector::new(store, ctx.planar_crs.clone()),
        }
    }

    pub fn resolve(&self, project: &ProjectDir) -> Result<RegionName> {
        self.resolver.resolve(project)
    }

    /// Clip one dataset, resolving the region first when none is given
    pub fn clip(
        &self,
        project: &ProjectDir,
        region: Option<RegionName>,
        target: ClipTarget,
    ) -> Result<SelectionSummary> {
        if target == ClipTarget::Catchment {
            require_network_selection(project)?;
        }
        let region = match region {
            Some(region) => region,
            None => self.resolve(project)?,
        };
        match target {
            ClipTarget::Drainageline => self.network.select(project, &region),
            ClipTarget::Catchment => self.catchments.select(project, &region),
        }
    }

    /// Run every stage in order
    pub fn run(&self, project: &ProjectDir, region: Option<RegionName>) -> Result<ClipReport> {
        let region = match region {
            Some(region) => region,
            None => self.resolve(project)?,
        };
        tracing::info!(project = %project.name, region = %region, "Running clip pipeline");

        let drainageline = self.network.select(project, &region)?;
        let catchment = self.catchments.select(project, &region)?;

        Ok(ClipReport {
            region,
            drainageline,
            catchment,
        })
    }
}
