use async_trait::async_trait;
use hydroviewer_core::error::{HydroviewerError, Result};
use hydroviewer_core::models::MapServerTarget;
use hydroviewer_core::ports::MapServer;

/// GeoServer REST client
///
/// Uploads create the datastore (and its single layer) when missing and
/// overwrite it otherwise.
pub struct GeoServerClient {
    client: reqwest::Client,
}

impl GeoServerClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// `PUT` endpoint for a zipped shapefile datastore
    pub fn upload_url(target: &MapServerTarget, store: &str) -> String {
        format!(
            "{}/workspaces/{}/datastores/{}/file.shp?update=overwrite",
            target.url.trim_end_matches('/'),
            target.workspace,
            store
        )
    }
}

impl Default for GeoServerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MapServer for GeoServerClient {
    async fn upload_shapefile(
        &self,
        target: &MapServerTarget,
        store: &str,
        zipped_shapefile: Vec<u8>,
    ) -> Result<()> {
        let url = Self::upload_url(target, store);
        tracing::debug!(
            url = %url,
            bytes = zipped_shapefile.len(),
            "Uploading shapefile to GeoServer"
        );

        let response = self
            .client
            .put(&url)
            .basic_auth(&target.username, Some(&target.password))
            .header(reqwest::header::CONTENT_TYPE, "application/zip")
            .body(zipped_shapefile)
            .send()
            .await
            .map_err(|e| HydroviewerError::Collaborator {
                service: "GeoServer".to_string(),
                reason: format!("Failed to connect to {}: {}", target.url, e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(HydroviewerError::Collaborator {
                service: "GeoServer".to_string(),
                reason: format!("Upload of '{}' failed ({}): {}", store, status, error_text),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_url() {
        let target = MapServerTarget::with_defaults("https://maps.example.org/geoserver/rest/");
        assert_eq!(
            GeoServerClient::upload_url(&target, "catchments"),
            "https://maps.example.org/geoserver/rest/workspaces/geoglows_hydroviewer_creator/datastores/catchments/file.shp?update=overwrite"
        );
    }
}
