use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use hydroviewer_pipeline::normalizer::fetch_atlas_boundary;
use hydroviewer_pipeline::BoundarySummary;
use hydroviewer_store::boundary_files;
use hydroviewer_store::UploadedFile;
use serde_json::Value;

use super::run_blocking;
use crate::dto::BoundaryRequest;
use crate::error::ApiError;
use crate::state::AppState;

/// GET the geographic boundary as stored
pub async fn get_boundaries(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let text = run_blocking(move || {
        let dir = state.projects.open(&project)?;
        boundary_files::read_geographic_text(&dir)
    })
    .await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], text))
}

/// Set the boundary from inline GeoJSON or a Living Atlas region
pub async fn set_boundaries(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    Json(request): Json<BoundaryRequest>,
) -> Result<Json<BoundarySummary>, ApiError> {
    let text = match (request.geojson, request.esri) {
        (Some(Value::String(text)), _) => text,
        (Some(value), _) => value.to_string(),
        (None, Some(region)) => {
            tracing::info!(
                project = %project,
                region = %region,
                "Setting boundary from Living Atlas"
            );
            // Check the project before spending a request on it
            let name = project.clone();
            let projects = state.projects.clone();
            run_blocking(move || projects.open(&name)).await?;
            fetch_atlas_boundary(state.atlas.as_ref(), &region).await?
        }
        (None, None) => {
            return Err(ApiError::bad_request("No boundary provided")
                .with_details("Expected a 'geojson' or 'esri' field"));
        }
    };

    let summary = run_blocking(move || {
        let dir = state.projects.open(&project)?;
        state.normalizer.from_geojson(&dir, &text)
    })
    .await?;
    Ok(Json(summary))
}

/// Set the boundary from an uploaded shapefile, one `files` part per component
pub async fn upload_boundary_shapefile(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<BoundarySummary>, ApiError> {
    let files = extract_files(&mut multipart).await?;
    tracing::info!(project = %project, files = files.len(), "Received boundary shapefile");

    let summary = run_blocking(move || {
        let dir = state.projects.open(&project)?;
        state.normalizer.from_shapefile(&dir, files)
    })
    .await?;
    Ok(Json(summary))
}

async fn extract_files(multipart: &mut Multipart) -> Result<Vec<UploadedFile>, ApiError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::bad_request("Failed to parse multipart form").with_details(e.to_string())
    })? {
        if field.name() != Some("files") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::bad_request("Uploaded part has no file name"))?;
        let data = field.bytes().await.map_err(|e| {
            ApiError::bad_request("Failed to read file data").with_details(e.to_string())
        })?;
        files.push(UploadedFile::new(file_name, data.to_vec()));
    }

    if files.is_empty() {
        return Err(ApiError::bad_request("No files provided")
            .with_details("Expected 'files' fields in the multipart form"));
    }
    Ok(files)
}
