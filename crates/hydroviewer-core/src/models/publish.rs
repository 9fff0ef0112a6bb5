//! Publishing targets and per-part outcomes.

use serde::{Deserialize, Serialize};

use super::region::ClipTarget;

/// Where and how to publish a project's selections on a map server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapServerTarget {
    /// REST endpoint, e.g. `https://host/geoserver/rest/`
    pub url: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub workspace: String,
    pub drainageline_layer: String,
    pub catchment_layer: String,
}

impl MapServerTarget {
    /// Target with the default credentials, workspace, and layer names
    pub fn with_defaults(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: "admin".to_string(),
            password: "geoserver".to_string(),
            workspace: "geoglows_hydroviewer_creator".to_string(),
            drainageline_layer: "drainagelines".to_string(),
            catchment_layer: "catchments".to_string(),
        }
    }

    pub fn layer_for(&self, target: ClipTarget) -> &str {
        match target {
            ClipTarget::Drainageline => &self.drainageline_layer,
            ClipTarget::Catchment => &self.catchment_layer,
        }
    }

    /// WMS endpoint matching the REST endpoint
    pub fn wms_url(&self) -> String {
        if self.url.contains("/rest/") {
            self.url.replace("/rest/", "/wms")
        } else if let Some(base) = self.url.strip_suffix("/rest") {
            format!("{}/wms", base)
        } else {
            self.url.clone()
        }
    }
}

/// Outcome of one independently attempted publish step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PartOutcome {
    Succeeded,
    Failed { reason: String },
}

impl PartOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PartOutcome::Succeeded)
    }
}

/// Result of publishing both selections to a map server
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    pub catchment: PartOutcome,
    pub drainageline: PartOutcome,
    /// Whether `geoserver_config.json` was written
    pub config_written: bool,
}

impl PublishReport {
    pub fn all_succeeded(&self) -> bool {
        self.catchment.is_success() && self.drainageline.is_success()
    }

    pub fn any_succeeded(&self) -> bool {
        self.catchment.is_success() || self.drainageline.is_success()
    }

    pub fn outcome(&self, target: ClipTarget) -> &PartOutcome {
        match target {
            ClipTarget::Drainageline => &self.drainageline,
            ClipTarget::Catchment => &self.catchment,
        }
    }
}
