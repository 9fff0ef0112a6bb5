use std::sync::Arc;

use hydroviewer_core::config::AppContext;
use hydroviewer_core::models::MapServerTarget;
use hydroviewer_core::ports::{AtlasSource, MapServer};
use hydroviewer_pipeline::{BoundaryNormalizer, ClipPipeline};
use hydroviewer_store::{GeometryStore, ProjectStore};

#[derive(Clone)]
pub struct AppState {
    pub ctx: AppContext,
    pub projects: ProjectStore,
    pub store: GeometryStore,
    pub normalizer: BoundaryNormalizer,
    pub pipeline: ClipPipeline,
    pub atlas: Arc<dyn AtlasSource>,
    pub map_server: Arc<dyn MapServer>,
    /// Configured GeoServer target, if any; requests may override it
    pub map_target: Option<MapServerTarget>,
}

impl AppState {
    pub fn new(
        ctx: AppContext,
        atlas: Arc<dyn AtlasSource>,
        map_server: Arc<dyn MapServer>,
        map_target: Option<MapServerTarget>,
    ) -> Self {
        Self {
            projects: ProjectStore::new(ctx.projects_dir()),
            store: GeometryStore::new(&ctx.shapefile_dir),
            normalizer: BoundaryNormalizer::from_context(&ctx),
            pipeline: ClipPipeline::new(&ctx),
            ctx,
            atlas,
            map_server,
            map_target,
        }
    }
}
