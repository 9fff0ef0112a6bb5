//! Project directories under `<workspace>/projects/`.

use chrono::{DateTime, Utc};
use hydroviewer_core::error::{HydroviewerError, Result};
use hydroviewer_core::models::{ClipTarget, GeoserverConfig, ProjectDir, ProjectName, ProjectState};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::fs_util;

/// Creates, lists, opens, and deletes projects
#[derive(Debug, Clone)]
pub struct ProjectStore {
    projects_dir: PathBuf,
}

impl ProjectStore {
    pub fn new(projects_dir: impl Into<PathBuf>) -> Self {
        Self {
            projects_dir: projects_dir.into(),
        }
    }

    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    /// Create a new, empty project
    pub fn create(&self, raw_name: &str) -> Result<ProjectDir> {
        let name = ProjectName::parse(raw_name)?;
        fs::create_dir_all(&self.projects_dir)?;

        let root = self.projects_dir.join(name.as_str());
        match fs::create_dir(&root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(HydroviewerError::ProjectExists {
                    name: name.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(project = %name, path = %root.display(), "Created project");
        Ok(ProjectDir::new(name, root))
    }

    /// Every project directory, sorted by name
    pub fn list(&self) -> Result<Vec<ProjectName>> {
        let entries = match fs::read_dir(&self.projects_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            match entry.file_name().to_str().map(ProjectName::parse) {
                Some(Ok(name)) if name.as_str() == entry.file_name().to_string_lossy() => {
                    names.push(name)
                }
                _ => tracing::debug!(entry = ?entry.file_name(), "Ignoring non-project directory"),
            }
        }
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(names)
    }

    /// Open an existing project
    pub fn open(&self, raw_name: &str) -> Result<ProjectDir> {
        let name = ProjectName::parse(raw_name)?;
        let root = self.projects_dir.join(name.as_str());
        if !root.is_dir() {
            return Err(HydroviewerError::ProjectNotFound {
                name: name.to_string(),
            });
        }
        Ok(ProjectDir::new(name, root))
    }

    /// Remove a project and everything in it
    pub fn delete(&self, raw_name: &str) -> Result<()> {
        let project = self.open(raw_name)?;
        fs::remove_dir_all(project.path())?;
        tracing::info!(project = %project.name, "Deleted project");
        Ok(())
    }

    /// Progress of a project, read from the files present
    pub fn state(&self, project: &ProjectDir) -> Result<ProjectState> {
        let drainageline = project.selection_dir(ClipTarget::Drainageline).is_dir();
        let catchment = project.selection_dir(ClipTarget::Catchment).is_dir();

        let boundaries_json = project.boundaries_json();
        let boundaries_updated_at = if boundaries_json.exists() {
            Some(DateTime::<Utc>::from(fs_util::newest_mtime(&boundaries_json)?))
        } else {
            None
        };

        Ok(ProjectState {
            name: project.name.clone(),
            title: project.name.title(),
            boundaries: boundaries_json.exists(),
            projected_boundary: project.projected_shp().exists(),
            drainageline,
            catchment,
            shapefiles: drainageline && catchment,
            geoserver: read_geoserver_config(project)?,
            archive: project.archive().exists(),
            html: project.html().exists(),
            boundaries_updated_at,
        })
    }
}

/// Map-server configuration recorded by the last publish, if any
pub fn read_geoserver_config(project: &ProjectDir) -> Result<Option<GeoserverConfig>> {
    let path = project.geoserver_config();
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&text)?))
}

pub fn write_geoserver_config(project: &ProjectDir, config: &GeoserverConfig) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(config)?;
    fs_util::write_file_atomic(&project.geoserver_config(), &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(root: &TempDir) -> ProjectStore {
        ProjectStore::new(root.path().join("projects"))
    }

    #[test]
    fn test_create_normalizes_and_rejects_duplicates() {
        let root = TempDir::new().unwrap();
        let store = store(&root);

        let project = store.create("Upper Nile").unwrap();
        assert_eq!(project.name.as_str(), "Upper_Nile");
        assert!(project.path().is_dir());

        assert!(matches!(
            store.create("Upper  Nile"),
            Err(HydroviewerError::ProjectExists { .. })
        ));
    }

    #[test]
    fn test_list_open_delete() {
        let root = TempDir::new().unwrap();
        let store = store(&root);
        assert!(store.list().unwrap().is_empty());

        store.create("b").unwrap();
        store.create("a").unwrap();
        fs::write(store.projects_dir().join("stray.txt"), b"").unwrap();

        let names: Vec<_> = store.list().unwrap().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, vec!["a", "b"]);

        store.delete("a").unwrap();
        assert!(matches!(store.open("a"), Err(HydroviewerError::ProjectNotFound { .. })));
        assert!(matches!(store.delete("a"), Err(HydroviewerError::ProjectNotFound { .. })));
    }

    #[test]
    fn test_state_follows_files() {
        let root = TempDir::new().unwrap();
        let store = store(&root);
        let project = store.create("demo").unwrap();

        let state = store.state(&project).unwrap();
        assert!(!state.boundaries);
        assert!(!state.shapefiles);
        assert!(state.geoserver.is_none());
        assert!(state.boundaries_updated_at.is_none());

        fs::write(project.boundaries_json(), b"{}").unwrap();
        fs::create_dir_all(project.selection_dir(ClipTarget::Drainageline)).unwrap();
        let state = store.state(&project).unwrap();
        assert!(state.boundaries);
        assert!(state.drainageline);
        assert!(!state.shapefiles);
        assert!(state.boundaries_updated_at.is_some());

        fs::create_dir_all(project.selection_dir(ClipTarget::Catchment)).unwrap();
        let config = GeoserverConfig {
            url: "http://localhost:8080/geoserver/wms".to_string(),
            workspace: "ws".to_string(),
            dl_layer: "drainagelines".to_string(),
            ctch_layer: "catchments".to_string(),
        };
        write_geoserver_config(&project, &config).unwrap();

        let state = store.state(&project).unwrap();
        assert!(state.shapefiles);
        assert_eq!(state.geoserver, Some(config));
        assert!(!state.archive);
        assert!(!state.html);
    }
}
