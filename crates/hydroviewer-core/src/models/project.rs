//! Project naming and on-disk layout.
//!
//! A project is nothing more than a directory under `<workspace>/projects/`.
//! Which pipeline steps have run is read back from the files in it every
//! time; nothing else records progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::region::ClipTarget;
use crate::error::{HydroviewerError, Result};

pub const BOUNDARIES_FILE: &str = "boundaries.json";
pub const PROJECTED_DIR: &str = "projected_selections";
pub const GEOSERVER_CONFIG_FILE: &str = "geoserver_config.json";
pub const ARCHIVE_FILE: &str = "hydroviewer_shapefiles.zip";
pub const HTML_FILE: &str = "hydroviewer.html";

/// Directory and shapefile stem holding a clipped selection
pub fn selection_layout(target: ClipTarget) -> (&'static str, &'static str) {
    match target {
        ClipTarget::Drainageline => ("selected_drainageline", "drainageline_select"),
        ClipTarget::Catchment => ("selected_catchment", "catchment_select"),
    }
}

/// Normalized project name: whitespace runs collapsed to `_`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Normalize a user-supplied name into a directory-safe token
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.split_whitespace().collect::<Vec<_>>().join("_");

        let invalid = |reason: &str| HydroviewerError::InvalidProjectName {
            name: raw.to_string(),
            reason: reason.to_string(),
        };

        if normalized.is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if normalized.starts_with('.') {
            return Err(invalid("name must not start with '.'"));
        }
        if normalized.contains(['/', '\\']) {
            return Err(invalid("name must not contain path separators"));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable title, underscores shown as spaces
    pub fn title(&self) -> String {
        self.0.replace('_', " ")
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A project's directory and the artifact paths inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDir {
    pub name: ProjectName,
    pub root: PathBuf,
}

impl ProjectDir {
    pub fn new(name: ProjectName, root: impl Into<PathBuf>) -> Self {
        Self {
            name,
            root: root.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Geographic copy of the boundary
    pub fn boundaries_json(&self) -> PathBuf {
        self.root.join(BOUNDARIES_FILE)
    }

    /// Directory of the planar copy of the boundary
    pub fn projected_dir(&self) -> PathBuf {
        self.root.join(PROJECTED_DIR)
    }

    pub fn projected_shp(&self) -> PathBuf {
        self.projected_dir().join(format!("{}.shp", PROJECTED_DIR))
    }

    pub fn selection_dir(&self, target: ClipTarget) -> PathBuf {
        self.root.join(selection_layout(target).0)
    }

    pub fn selection_shp(&self, target: ClipTarget) -> PathBuf {
        let (dir, stem) = selection_layout(target);
        self.root.join(dir).join(format!("{}.shp", stem))
    }

    pub fn geoserver_config(&self) -> PathBuf {
        self.root.join(GEOSERVER_CONFIG_FILE)
    }

    pub fn archive(&self) -> PathBuf {
        self.root.join(ARCHIVE_FILE)
    }

    pub fn html(&self) -> PathBuf {
        self.root.join(HTML_FILE)
    }
}

/// Map server layers a project was published to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoserverConfig {
    /// WMS endpoint of the map server
    pub url: String,
    pub workspace: String,
    pub dl_layer: String,
    pub ctch_layer: String,
}

/// Progress of a project, derived from the files present
#[derive(Debug, Clone, Serialize)]
pub struct ProjectState {
    pub name: ProjectName,
    pub title: String,
    pub boundaries: bool,
    pub projected_boundary: bool,
    pub drainageline: bool,
    pub catchment: bool,
    /// Both selections exist
    pub shapefiles: bool,
    pub geoserver: Option<GeoserverConfig>,
    pub archive: bool,
    pub html: bool,
    pub boundaries_updated_at: Option<DateTime<Utc>>,
}
