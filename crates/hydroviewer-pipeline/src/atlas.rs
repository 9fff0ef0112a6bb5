use async_trait::async_trait;
use hydroviewer_core::error::{HydroviewerError, Result};
use hydroviewer_core::ports::AtlasSource;

/// World regions published by the ESRI Living Atlas
pub const ATLAS_REGIONS: &[&str] = &[
    "Antarctica",
    "Asiatic Russia",
    "Australia/New Zealand",
    "Caribbean",
    "Central America",
    "Central Asia",
    "Eastern Africa",
    "Eastern Asia",
    "Eastern Europe",
    "European Russia",
    "Melanesia",
    "Micronesia",
    "Middle Africa",
    "Northern Africa",
    "Northern America",
    "Northern Europe",
    "Polynesia",
    "South America",
    "Southeastern Asia",
    "Southern Africa",
    "Southern Asia",
    "Southern Europe",
    "Western Africa",
    "Western Asia",
    "Western Europe",
];

/// Living Atlas world-regions feature service client
pub struct LivingAtlasClient {
    /// Query endpoint of the feature layer
    query_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl LivingAtlasClient {
    pub fn new(query_url: impl Into<String>) -> Self {
        Self {
            query_url: query_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn request_url(&self, region: &str) -> Result<reqwest::Url> {
        // Single quotes are doubled inside an ArcGIS SQL string literal
        let filter = format!("REGION = '{}'", region.replace('\'', "''"));
        reqwest::Url::parse_with_params(
            &self.query_url,
            &[("where", filter.as_str()), ("outFields", "*"), ("outSR", "4326"), ("f", "geojson")],
        )
        .map_err(|e| HydroviewerError::ConfigInvalid {
            key: "atlas_url".to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl AtlasSource for LivingAtlasClient {
    async fn fetch_region_geojson(&self, region: &str) -> Result<String> {
        let url = self.request_url(region)?;

        let response = self.client.get(url).send().await.map_err(|e| {
            HydroviewerError::Collaborator {
                service: "Living Atlas".to_string(),
                reason: format!("Failed to connect to {}: {}", self.query_url, e),
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(HydroviewerError::Collaborator {
                service: "Living Atlas".to_string(),
                reason: format!("API error ({}): {}", status, error_text),
            });
        }

        response.text().await.map_err(|e| HydroviewerError::Collaborator {
            service: "Living Atlas".to_string(),
            reason: format!("Failed to read response: {}", e),
        })
    }

    fn region_names(&self) -> &[&'static str] {
        ATLAS_REGIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_quotes_region() {
        let client = LivingAtlasClient::new("https://example.com/FeatureServer/0/query");
        let url = client.request_url("Australia/New Zealand").unwrap();
        let pairs: Vec<(String, String)> =
            url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        assert!(pairs.contains(&(
            "where".to_string(),
            "REGION = 'Australia/New Zealand'".to_string()
        )));
        assert!(pairs.contains(&("f".to_string(), "geojson".to_string())));
    }

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        let client = LivingAtlasClient::new("not a url");
        assert!(matches!(
            client.request_url("Caribbean"),
            Err(HydroviewerError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_region_list() {
        let client = LivingAtlasClient::new("https://example.com/query");
        assert_eq!(client.region_names().len(), 25);
        assert!(client.region_names().contains(&"Western Europe"));
    }
}
