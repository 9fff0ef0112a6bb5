use crate::error::{HydroviewerError, Result};
use crate::models::{Crs, MapServerTarget};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the app workspace
pub const CONFIG_FILE: &str = "hydroviewer.toml";

pub const DEFAULT_ATLAS_URL: &str = "https://services.arcgis.com/P3ePLMYs2RVChkJx/arcgis/rest/services/World_Regions/FeatureServer/0/query";
pub const DEFAULT_API_ENDPOINT: &str = "https://tethys2.byu.edu/localsptapi/api/";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the hydroviewer creator
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub workspace: ConfigValue<PathBuf>,
    pub shapefile_dir: ConfigValue<Option<PathBuf>>,
    pub planar_crs: ConfigValue<u32>,
    pub geographic_crs: ConfigValue<u32>,
    pub atlas_url: ConfigValue<String>,
    pub api_endpoint: ConfigValue<String>,
    pub geoserver_url: ConfigValue<Option<String>>,
    pub geoserver_username: ConfigValue<String>,
    pub geoserver_password: ConfigValue<String>,
    pub geoserver_workspace: ConfigValue<String>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let geoserver = MapServerTarget::with_defaults("");
        Self {
            workspace: ConfigValue::new(PathBuf::from("workspace"), ConfigSource::Default),
            shapefile_dir: ConfigValue::new(None, ConfigSource::Default),
            planar_crs: ConfigValue::new(3857, ConfigSource::Default),
            geographic_crs: ConfigValue::new(4326, ConfigSource::Default),
            atlas_url: ConfigValue::new(DEFAULT_ATLAS_URL.to_string(), ConfigSource::Default),
            api_endpoint: ConfigValue::new(DEFAULT_API_ENDPOINT.to_string(), ConfigSource::Default),
            geoserver_url: ConfigValue::new(None, ConfigSource::Default),
            geoserver_username: ConfigValue::new(geoserver.username, ConfigSource::Default),
            geoserver_password: ConfigValue::new(geoserver.password, ConfigSource::Default),
            geoserver_workspace: ConfigValue::new(geoserver.workspace, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| HydroviewerError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| HydroviewerError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(workspace) = file_config.workspace {
            self.workspace.update(workspace, ConfigSource::File);
        }
        if let Some(dir) = file_config.shapefile_dir {
            self.shapefile_dir.update(Some(dir), ConfigSource::File);
        }
        if let Some(crs) = file_config.planar_crs {
            self.planar_crs.update(crs, ConfigSource::File);
        }
        if let Some(crs) = file_config.geographic_crs {
            self.geographic_crs.update(crs, ConfigSource::File);
        }
        if let Some(url) = file_config.atlas_url {
            self.atlas_url.update(url, ConfigSource::File);
        }
        if let Some(endpoint) = file_config.api_endpoint {
            self.api_endpoint.update(endpoint, ConfigSource::File);
        }
        if let Some(geoserver) = file_config.geoserver {
            if let Some(url) = geoserver.url {
                self.geoserver_url.update(Some(url), ConfigSource::File);
            }
            if let Some(username) = geoserver.username {
                self.geoserver_username.update(username, ConfigSource::File);
            }
            if let Some(password) = geoserver.password {
                self.geoserver_password.update(password, ConfigSource::File);
            }
            if let Some(workspace) = geoserver.workspace {
                self.geoserver_workspace.update(workspace, ConfigSource::File);
            }
        }

        Ok(self)
    }

    /// Load `hydroviewer.toml` from the configured workspace when present
    pub fn load_workspace_file(self) -> Result<Self> {
        let path = self.workspace.value.join(CONFIG_FILE);
        if path.exists() {
            self.load_from_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(workspace) = env::var("HYDROVIEWER_WORKSPACE") {
            self.workspace.update(PathBuf::from(workspace), ConfigSource::Environment);
        }

        if let Ok(dir) = env::var("HYDROVIEWER_SHAPEFILE_DIR") {
            self.shapefile_dir.update(Some(PathBuf::from(dir)), ConfigSource::Environment);
        }

        if let Ok(crs_str) = env::var("HYDROVIEWER_PLANAR_CRS") {
            match parse_epsg(&crs_str) {
                Ok(crs) => self.planar_crs.update(crs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid HYDROVIEWER_PLANAR_CRS value '{}': expected integer EPSG code",
                    crs_str
                ),
            }
        }

        if let Ok(crs_str) = env::var("HYDROVIEWER_GEOGRAPHIC_CRS") {
            match parse_epsg(&crs_str) {
                Ok(crs) => self.geographic_crs.update(crs, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid HYDROVIEWER_GEOGRAPHIC_CRS value '{}': expected integer EPSG code",
                    crs_str
                ),
            }
        }

        if let Ok(url) = env::var("HYDROVIEWER_ATLAS_URL") {
            self.atlas_url.update(url, ConfigSource::Environment);
        }

        if let Ok(endpoint) = env::var("HYDROVIEWER_API_ENDPOINT") {
            self.api_endpoint.update(endpoint, ConfigSource::Environment);
        }

        if let Ok(url) = env::var("HYDROVIEWER_GEOSERVER_URL") {
            self.geoserver_url.update(Some(url), ConfigSource::Environment);
        }

        if let Ok(username) = env::var("HYDROVIEWER_GEOSERVER_USERNAME") {
            self.geoserver_username.update(username, ConfigSource::Environment);
        }

        if let Ok(password) = env::var("HYDROVIEWER_GEOSERVER_PASSWORD") {
            self.geoserver_password.update(password, ConfigSource::Environment);
        }

        if let Ok(workspace) = env::var("HYDROVIEWER_GEOSERVER_WORKSPACE") {
            self.geoserver_workspace.update(workspace, ConfigSource::Environment);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(workspace) = overrides.workspace {
            self.workspace.update(workspace, ConfigSource::Cli);
        }

        if let Some(dir) = overrides.shapefile_dir {
            self.shapefile_dir.update(Some(dir), ConfigSource::Cli);
        }

        if let Some(url) = overrides.geoserver_url {
            self.geoserver_url.update(Some(url), ConfigSource::Cli);
        }
    }

    /// Resolve the layered values into the context passed to every component
    pub fn to_context(&self) -> Result<AppContext> {
        if self.planar_crs.value == self.geographic_crs.value {
            return Err(HydroviewerError::ConfigInvalid {
                key: "planar_crs".to_string(),
                reason: format!(
                    "planar and geographic CRS are both EPSG:{}",
                    self.planar_crs.value
                ),
            });
        }

        let workspace = self.workspace.value.clone();
        let shapefile_dir =
            self.shapefile_dir.value.clone().unwrap_or_else(|| workspace.join("shapefiles"));

        Ok(AppContext {
            workspace,
            shapefile_dir,
            planar_crs: Crs::from_epsg(self.planar_crs.value),
            geographic_crs: Crs::from_epsg(self.geographic_crs.value),
            atlas_url: self.atlas_url.value.clone(),
            api_endpoint: self.api_endpoint.value.clone(),
        })
    }

    /// Map server target from the configured GeoServer settings
    pub fn map_server_target(&self) -> Option<MapServerTarget> {
        self.geoserver_url.value.as_ref().map(|url| {
            let mut target = MapServerTarget::with_defaults(url.clone());
            target.username = self.geoserver_username.value.clone();
            target.password = self.geoserver_password.value.clone();
            target.workspace = self.geoserver_workspace.value.clone();
            target
        })
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "workspace".to_string(),
            (self.workspace.value.display().to_string(), self.workspace.source),
        );

        map.insert(
            "shapefile_dir".to_string(),
            (
                self.shapefile_dir
                    .value
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<workspace>/shapefiles".to_string()),
                self.shapefile_dir.source,
            ),
        );

        map.insert(
            "planar_crs".to_string(),
            (format!("EPSG:{}", self.planar_crs.value), self.planar_crs.source),
        );

        map.insert(
            "geographic_crs".to_string(),
            (format!("EPSG:{}", self.geographic_crs.value), self.geographic_crs.source),
        );

        map.insert("atlas_url".to_string(), (self.atlas_url.value.clone(), self.atlas_url.source));

        map.insert(
            "api_endpoint".to_string(),
            (self.api_endpoint.value.clone(), self.api_endpoint.source),
        );

        map.insert(
            "geoserver_url".to_string(),
            (
                self.geoserver_url.value.clone().unwrap_or_else(|| "(unset)".to_string()),
                self.geoserver_url.source,
            ),
        );

        map.insert(
            "geoserver_workspace".to_string(),
            (self.geoserver_workspace.value.clone(), self.geoserver_workspace.source),
        );

        map
    }
}

/// Explicit context handed to every pipeline component
#[derive(Debug, Clone)]
pub struct AppContext {
    /// App workspace holding `projects/` and the viewer template
    pub workspace: PathBuf,
    /// Geometry store directory of per-region zipped shapefiles
    pub shapefile_dir: PathBuf,
    pub planar_crs: Crs,
    pub geographic_crs: Crs,
    pub atlas_url: String,
    pub api_endpoint: String,
}

impl AppContext {
    pub fn projects_dir(&self) -> PathBuf {
        self.workspace.join("projects")
    }

    /// Viewer template rendered by the HTML export
    pub fn html_template(&self) -> PathBuf {
        self.workspace.join("hydroviewer_interactive.html")
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    workspace: Option<PathBuf>,
    shapefile_dir: Option<PathBuf>,
    planar_crs: Option<u32>,
    geographic_crs: Option<u32>,
    atlas_url: Option<String>,
    api_endpoint: Option<String>,
    geoserver: Option<FileGeoserverConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
struct FileGeoserverConfig {
    url: Option<String>,
    username: Option<String>,
    password: Option<String>,
    workspace: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub workspace: Option<PathBuf>,
    pub shapefile_dir: Option<PathBuf>,
    pub geoserver_url: Option<String>,
}

/// Parse an EPSG code, accepting `3857` or `EPSG:3857`
pub fn parse_epsg(s: &str) -> Result<u32> {
    let trimmed = s.trim();
    let code = trimmed
        .strip_prefix("EPSG:")
        .or_else(|| trimmed.strip_prefix("epsg:"))
        .unwrap_or(trimmed);

    code.parse::<u32>().map_err(|_| HydroviewerError::ConfigInvalid {
        key: "crs".to_string(),
        reason: format!("Invalid EPSG code: {}", s),
    })
}
