//! Error types for Hydroviewer

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HydroviewerError {
    // Project errors
    #[error("Project not found: {name}")]
    ProjectNotFound { name: String },

    #[error("Project already exists: {name}")]
    ProjectExists { name: String },

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    // Boundary errors
    #[error("Invalid boundary: {reason}")]
    InvalidBoundary { reason: String },

    #[error("Invalid upload: {reason}")]
    InvalidUpload { reason: String },

    // Geometry store errors
    #[error("Unknown dataset role '{role}'. Expected 'drainageline' or 'catchment'")]
    UnknownDatasetRole { role: String },

    #[error("Region dataset not found: {name} (looked in {path})")]
    RegionNotFound { name: String, path: PathBuf },

    #[error("Invalid region name '{name}'")]
    InvalidRegionName { name: String },

    #[error("No region in the geometry store intersects the project boundary")]
    NoRegionFound,

    #[error("Invalid dataset {name}: {reason}")]
    InvalidDataset { name: String, reason: String },

    // Pipeline ordering
    #[error("Missing prerequisite: {prerequisite}. {remediation}")]
    PrerequisiteMissing {
        prerequisite: String,
        remediation: String,
    },

    // Geoprocessing errors
    #[error("Projection from EPSG:{from} to EPSG:{to} failed: {reason}")]
    Projection { from: u32, to: u32, reason: String },

    #[error("Shapefile error at {path}: {message}")]
    Shapefile { path: PathBuf, message: String },

    #[error("Archive error at {path}: {message}")]
    Archive { path: PathBuf, message: String },

    // Collaborator errors (atlas, map server)
    #[error("{service} request failed: {reason}")]
    Collaborator { service: String, reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HydroviewerError {
    /// Error for a stage that ran before the stage it depends on
    pub fn prerequisite(prerequisite: impl Into<String>, remediation: impl Into<String>) -> Self {
        Self::PrerequisiteMissing {
            prerequisite: prerequisite.into(),
            remediation: remediation.into(),
        }
    }

    /// Whether the error was caused by caller input rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidProjectName { .. }
                | Self::InvalidBoundary { .. }
                | Self::InvalidUpload { .. }
                | Self::UnknownDatasetRole { .. }
                | Self::InvalidRegionName { .. }
        )
    }
}

impl From<serde_json::Error> for HydroviewerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HydroviewerError>;
