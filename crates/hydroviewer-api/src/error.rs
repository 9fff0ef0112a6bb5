use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hydroviewer_core::error::HydroviewerError;
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<HydroviewerError> for ApiError {
    fn from(err: HydroviewerError) -> Self {
        let (status, message) = match &err {
            e if e.is_input_error() => (StatusCode::BAD_REQUEST, "Invalid request"),
            HydroviewerError::ProjectNotFound { .. } => {
                (StatusCode::NOT_FOUND, "Project not found")
            }
            HydroviewerError::RegionNotFound { .. } => {
                (StatusCode::NOT_FOUND, "Region dataset not found")
            }
            HydroviewerError::ProjectExists { .. } => {
                (StatusCode::CONFLICT, "Project already exists")
            }
            HydroviewerError::NoRegionFound => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Boundary is outside every region")
            }
            HydroviewerError::PrerequisiteMissing { .. } => {
                (StatusCode::CONFLICT, "Pipeline step has not run yet")
            }
            HydroviewerError::Collaborator { .. } => {
                (StatusCode::BAD_GATEWAY, "Upstream service failed")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
        };

        if status.is_server_error() {
            tracing::error!(error = %err, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %err, status = status.as_u16(), "Request rejected");
        }

        Self::new(status, message).with_details(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                HydroviewerError::InvalidBoundary {
                    reason: "empty".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                HydroviewerError::UnknownDatasetRole {
                    role: "boundary".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                HydroviewerError::ProjectNotFound {
                    name: "x".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (HydroviewerError::NoRegionFound, StatusCode::UNPROCESSABLE_ENTITY),
            (HydroviewerError::prerequisite("boundary", "Set one"), StatusCode::CONFLICT),
            (
                HydroviewerError::Collaborator {
                    service: "GeoServer".to_string(),
                    reason: "timeout".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (HydroviewerError::Serialization("bad".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status, expected);
        }
    }

    #[test]
    fn test_details_carry_the_error_message() {
        let err = ApiError::from(HydroviewerError::ProjectNotFound {
            name: "nile".to_string(),
        });
        assert_eq!(err.details.as_deref(), Some("Project not found: nile"));
    }
}
