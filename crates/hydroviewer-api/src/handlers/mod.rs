mod boundaries;
mod clip;
mod export;
mod health;
mod projects;
mod regions;

pub use boundaries::{get_boundaries, set_boundaries, upload_boundary_shapefile};
pub use clip::clip;
pub use export::{export_geoserver, export_html, export_zip};
pub use health::health_check;
pub use projects::{create_project, delete_project, get_project, list_projects};
pub use regions::{get_region, list_atlas_regions, list_regions};

use hydroviewer_core::error::Result;

use crate::error::ApiError;

/// Run filesystem and geoprocessing work on the blocking pool
pub(crate) async fn run_blocking<T, F>(task: F) -> std::result::Result<T, ApiError>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ApiError::internal("Background task failed").with_details(e.to_string()))?
        .map_err(ApiError::from)
}
