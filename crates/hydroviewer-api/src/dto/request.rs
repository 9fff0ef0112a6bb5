use serde::Deserialize;
use serde_json::Value;

/// Create project request body
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
}

/// Boundary request body: inline GeoJSON or a Living Atlas region name
///
/// `geojson` may be a GeoJSON object or a string holding one. When both
/// fields are present `geojson` wins.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BoundaryRequest {
    pub geojson: Option<Value>,
    pub esri: Option<String>,
}

/// Query parameters of the clip route
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClipParams {
    pub region: Option<String>,
    /// `drainageline` or `catchment`; both when absent
    pub shapefile: Option<String>,
}

/// GeoServer publish request; unset fields fall back to the server config
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PublishRequest {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub workspace: Option<String>,
    pub drainageline_layer: Option<String>,
    pub catchment_layer: Option<String>,
}
