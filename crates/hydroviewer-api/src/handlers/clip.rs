use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use hydroviewer_core::models::{ClipTarget, RegionName};

use super::run_blocking;
use crate::dto::{ClipParams, ClipResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Clip one dataset, or run both clips when `shapefile` is absent
///
/// Without `region` the region is resolved from the boundary first.
pub async fn clip(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    Query(params): Query<ClipParams>,
) -> Result<Json<ClipResponse>, ApiError> {
    let region = params.region.as_deref().map(RegionName::from_input).transpose()?;
    let target = params.shapefile.as_deref().map(str::parse::<ClipTarget>).transpose()?;

    tracing::info!(
        project = %project,
        region = ?region.as_ref().map(|r| r.as_str()),
        target = ?target,
        "Clipping project"
    );

    let response = run_blocking(move || {
        let dir = state.projects.open(&project)?;
        match target {
            Some(target) => state.pipeline.clip(&dir, region, target).map(ClipResponse::Selection),
            None => state.pipeline.run(&dir, region).map(ClipResponse::Report),
        }
    })
    .await?;
    Ok(Json(response))
}
