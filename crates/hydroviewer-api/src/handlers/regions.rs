use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use super::run_blocking;
use crate::dto::RegionResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// Region of the geometry store the project boundary falls in
pub async fn get_region(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
) -> Result<Json<RegionResponse>, ApiError> {
    let region = run_blocking(move || {
        let dir = state.projects.open(&project)?;
        state.pipeline.resolve(&dir)
    })
    .await?;
    Ok(Json(RegionResponse::from(region)))
}

pub async fn list_regions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RegionResponse>>, ApiError> {
    let regions = run_blocking(move || state.store.regions()).await?;
    Ok(Json(regions.into_iter().map(RegionResponse::from).collect()))
}

/// World regions accepted as `esri` boundaries
pub async fn list_atlas_regions(State(state): State<Arc<AppState>>) -> Json<Vec<&'static str>> {
    Json(state.atlas.region_names().to_vec())
}
