use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
///
/// `upload_limit` bounds the shapefile upload route only; every other route
/// keeps axum's default body limit.
pub fn create_router(state: Arc<AppState>, upload_limit: usize) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Projects
        .route("/api/v1/projects", get(handlers::list_projects).post(handlers::create_project))
        .route(
            "/api/v1/projects/{project}",
            get(handlers::get_project).delete(handlers::delete_project),
        )

        // Boundary
        .route(
            "/api/v1/projects/{project}/boundaries",
            get(handlers::get_boundaries).post(handlers::set_boundaries),
        )
        .route(
            "/api/v1/projects/{project}/boundaries/shapefile",
            post(handlers::upload_boundary_shapefile).layer(DefaultBodyLimit::max(upload_limit)),
        )

        // Region and clipping
        .route("/api/v1/projects/{project}/region", get(handlers::get_region))
        .route("/api/v1/projects/{project}/clip", post(handlers::clip))

        // Export
        .route("/api/v1/projects/{project}/export/zip", get(handlers::export_zip))
        .route("/api/v1/projects/{project}/export/html", get(handlers::export_html))
        .route("/api/v1/projects/{project}/export/geoserver", post(handlers::export_geoserver))

        // Region catalogs
        .route("/api/v1/regions", get(handlers::list_regions))
        .route("/api/v1/atlas-regions", get(handlers::list_atlas_regions))

        .with_state(state)
}
