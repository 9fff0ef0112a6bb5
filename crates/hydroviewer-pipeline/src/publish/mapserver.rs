use hydroviewer_core::error::Result;
use hydroviewer_core::models::{
    ClipTarget, GeoserverConfig, MapServerTarget, PartOutcome, ProjectDir, PublishReport,
};
use hydroviewer_core::ports::MapServer;
use hydroviewer_store::projects::write_geoserver_config;

use super::archive::zip_selection;
use super::{require_selections, PUBLISHED_TARGETS};

/// Upload both selections to a map server
///
/// Catchments and drainage lines are attempted independently; a failure of
/// one does not stop the other. The layer configuration is recorded when at
/// least one upload succeeded.
pub async fn publish_to_map_server(
    project: &ProjectDir,
    server: &dyn MapServer,
    target: &MapServerTarget,
) -> Result<PublishReport> {
    require_selections(project)?;

    let mut catchment = PartOutcome::Succeeded;
    let mut drainageline = PartOutcome::Succeeded;

    for clip_target in PUBLISHED_TARGETS {
        let layer = target.layer_for(clip_target);
        let outcome = match upload(project, server, target, clip_target, layer).await {
            Ok(()) => {
                tracing::info!(project = %project.name, layer = %layer, "Published layer");
                PartOutcome::Succeeded
            }
            Err(e) => {
                tracing::warn!(
                    project = %project.name,
                    layer = %layer,
                    error = %e,
                    "Failed to publish layer"
                );
                PartOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        match clip_target {
            ClipTarget::Catchment => catchment = outcome,
            ClipTarget::Drainageline => drainageline = outcome,
        }
    }

    let mut report = PublishReport {
        catchment,
        drainageline,
        config_written: false,
    };
    if report.any_succeeded() {
        let config = GeoserverConfig {
            url: target.wms_url(),
            workspace: target.workspace.clone(),
            dl_layer: target.drainageline_layer.clone(),
            ctch_layer: target.catchment_layer.clone(),
        };
        write_geoserver_config(project, &config)?;
        report.config_written = true;
    }

    Ok(report)
}

async fn upload(
    project: &ProjectDir,
    server: &dyn MapServer,
    target: &MapServerTarget,
    clip_target: ClipTarget,
    layer: &str,
) -> Result<()> {
    let bytes = zip_selection(project, clip_target, layer)?;
    server.upload_shapefile(target, layer, bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hydroviewer_core::error::HydroviewerError;
    use hydroviewer_core::models::project::selection_layout;
    use hydroviewer_core::models::ProjectName;
    use hydroviewer_store::projects::read_geoserver_config;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records uploads and rejects the stores listed in `failing`
    struct RecordingServer {
        failing: Vec<&'static str>,
        uploads: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MapServer for RecordingServer {
        async fn upload_shapefile(
            &self,
            _target: &MapServerTarget,
            store: &str,
            zipped_shapefile: Vec<u8>,
        ) -> Result<()> {
            assert!(!zipped_shapefile.is_empty());
            self.uploads.lock().unwrap().push(store.to_string());
            if self.failing.iter().any(|f| *f == store) {
                return Err(HydroviewerError::Collaborator {
                    service: "GeoServer".to_string(),
                    reason: "413 Payload Too Large".to_string(),
                });
            }
            Ok(())
        }
    }

    fn project_with_selections(root: &TempDir) -> ProjectDir {
        let project = ProjectDir::new(
            ProjectName::parse("demo").unwrap(),
            root.path().join("demo"),
        );
        for target in PUBLISHED_TARGETS {
            let (dir, stem) = selection_layout(target);
            let dir = project.path().join(dir);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(format!("{}.shp", stem)), b"shp").unwrap();
        }
        project
    }

    #[tokio::test]
    async fn test_partial_failure_is_reported_per_part() {
        let root = TempDir::new().unwrap();
        let project = project_with_selections(&root);
        let server = RecordingServer {
            failing: vec!["catchments"],
            uploads: Mutex::new(Vec::new()),
        };
        let target = MapServerTarget::with_defaults("http://localhost:8080/geoserver/rest/");

        let report = publish_to_map_server(&project, &server, &target).await.unwrap();

        assert!(matches!(
            report.catchment,
            PartOutcome::Failed { ref reason } if reason.contains("413")
        ));
        assert!(report.drainageline.is_success());
        assert!(report.config_written);
        assert_eq!(*server.uploads.lock().unwrap(), vec!["catchments", "drainagelines"]);

        let config = read_geoserver_config(&project).unwrap().unwrap();
        assert_eq!(config.url, "http://localhost:8080/geoserver/wms");
        assert_eq!(config.dl_layer, "drainagelines");
    }

    #[tokio::test]
    async fn test_total_failure_writes_no_config() {
        let root = TempDir::new().unwrap();
        let project = project_with_selections(&root);
        let server = RecordingServer {
            failing: vec!["catchments", "drainagelines"],
            uploads: Mutex::new(Vec::new()),
        };
        let target = MapServerTarget::with_defaults("http://localhost:8080/geoserver/rest/");

        let report = publish_to_map_server(&project, &server, &target).await.unwrap();
        assert!(!report.any_succeeded());
        assert!(!report.config_written);
        assert!(!project.geoserver_config().exists());
    }
}
