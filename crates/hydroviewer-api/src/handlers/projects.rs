use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use hydroviewer_core::models::ProjectState;

use super::run_blocking;
use crate::dto::{CreateProjectRequest, DeleteResponse, ProjectResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    tracing::info!(name = %request.name, "Creating project");

    let project = run_blocking(move || state.projects.create(&request.name)).await?;
    Ok((StatusCode::CREATED, Json(ProjectResponse::from(&project.name))))
}

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let names = run_blocking(move || state.projects.list()).await?;
    Ok(Json(names.iter().map(ProjectResponse::from).collect()))
}

/// Progress of a project, derived from the files present
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
) -> Result<Json<ProjectState>, ApiError> {
    let project_state = run_blocking(move || {
        let dir = state.projects.open(&project)?;
        state.projects.state(&dir)
    })
    .await?;
    Ok(Json(project_state))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    tracing::info!(project = %project, "Deleting project");

    let name = project.clone();
    run_blocking(move || state.projects.delete(&name)).await?;
    Ok(Json(DeleteResponse::success("project", &project)))
}
