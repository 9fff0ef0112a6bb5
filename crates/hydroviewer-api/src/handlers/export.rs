use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use hydroviewer_core::models::{MapServerTarget, PublishReport, ARCHIVE_FILE};
use hydroviewer_pipeline::publish::{build_archive, publish_to_map_server, render_viewer};

use super::run_blocking;
use crate::dto::PublishRequest;
use crate::error::ApiError;
use crate::state::AppState;

/// Download both selections as one zip archive
pub async fn export_zip(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = run_blocking(move || {
        let dir = state.projects.open(&project)?;
        let outcome = build_archive(&dir)?;
        Ok(std::fs::read(&outcome.path)?)
    })
    .await?;

    let disposition = format!("attachment; filename=\"{}\"", ARCHIVE_FILE);
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// Render and return the standalone viewer
pub async fn export_html(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
) -> Result<Html<String>, ApiError> {
    let html = run_blocking(move || {
        let dir = state.projects.open(&project)?;
        let path = render_viewer(&dir, &state.ctx)?;
        Ok(std::fs::read_to_string(path)?)
    })
    .await?;
    Ok(Html(html))
}

/// Publish both selections to GeoServer
///
/// Responds 200 when at least one layer was published and 502 when none
/// was; the body reports each part either way.
pub async fn export_geoserver(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    body: Option<Json<PublishRequest>>,
) -> Result<(StatusCode, Json<PublishReport>), ApiError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let target = resolve_target(state.map_target.clone(), request)?;

    let projects = state.projects.clone();
    let dir = run_blocking(move || projects.open(&project)).await?;

    tracing::info!(
        project = %dir.name,
        url = %target.url,
        workspace = %target.workspace,
        "Publishing to GeoServer"
    );
    let report = publish_to_map_server(&dir, state.map_server.as_ref(), &target).await?;

    let status = if report.any_succeeded() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    Ok((status, Json(report)))
}

/// Overlay request fields on the configured target
fn resolve_target(
    configured: Option<MapServerTarget>,
    request: PublishRequest,
) -> Result<MapServerTarget, ApiError> {
    let mut target = match (request.url, configured) {
        (Some(url), Some(mut configured)) => {
            configured.url = url;
            configured
        }
        (Some(url), None) => MapServerTarget::with_defaults(url),
        (None, Some(configured)) => configured,
        (None, None) => {
            return Err(ApiError::bad_request("No GeoServer URL")
                .with_details("Pass 'url' or set geoserver.url in hydroviewer.toml"));
        }
    };

    if let Some(username) = request.username {
        target.username = username;
    }
    if let Some(password) = request.password {
        target.password = password;
    }
    if let Some(workspace) = request.workspace {
        target.workspace = workspace;
    }
    if let Some(layer) = request.drainageline_layer {
        target.drainageline_layer = layer;
    }
    if let Some(layer) = request.catchment_layer {
        target.catchment_layer = layer;
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_overrides_configured_target() {
        let configured = MapServerTarget::with_defaults("http://localhost:8080/geoserver/rest/");
        let request = PublishRequest {
            workspace: Some("nile".to_string()),
            password: Some("secret".to_string()),
            ..Default::default()
        };

        let target = resolve_target(Some(configured), request).unwrap();
        assert_eq!(target.url, "http://localhost:8080/geoserver/rest/");
        assert_eq!(target.workspace, "nile");
        assert_eq!(target.password, "secret");
        assert_eq!(target.username, "admin");
    }

    #[test]
    fn test_missing_url_is_rejected() {
        let err = resolve_target(None, PublishRequest::default()).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
