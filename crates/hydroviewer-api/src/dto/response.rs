use hydroviewer_core::models::{ProjectName, RegionName};
use hydroviewer_pipeline::{ClipReport, SelectionSummary};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok",
            service: "hydroviewer-api",
        }
    }
}

/// Project response
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub name: String,
    pub title: String,
}

impl From<&ProjectName> for ProjectResponse {
    fn from(name: &ProjectName) -> Self {
        Self {
            name: name.to_string(),
            title: name.title(),
        }
    }
}

/// Delete operation response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

impl DeleteResponse {
    pub fn success(resource_type: &str, name: &str) -> Self {
        Self { success: true, message: format!("Deleted {} {}", resource_type, name) }
    }
}

/// Region response
#[derive(Debug, Serialize)]
pub struct RegionResponse {
    pub region: RegionName,
    pub display_name: String,
}

impl From<RegionName> for RegionResponse {
    fn from(region: RegionName) -> Self {
        Self {
            display_name: region.display_name(),
            region,
        }
    }
}

/// Result of the clip route: one selection, or both when no dataset was named
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ClipResponse {
    Selection(SelectionSummary),
    Report(ClipReport),
}
