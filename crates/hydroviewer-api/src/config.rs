use std::env;

use hydroviewer_core::config::LayeredConfig;
use hydroviewer_core::error::Result;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    /// Largest accepted shapefile upload, in bytes
    pub upload_limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            cors_origin: "http://localhost:3000".to_string(),
            upload_limit: 256 * 1024 * 1024,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env::var("HYDROVIEWER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let cors_origin = env::var("HYDROVIEWER_CORS_ORIGIN").unwrap_or(defaults.cors_origin);

        let upload_limit = env::var("HYDROVIEWER_UPLOAD_LIMIT_MB")
            .ok()
            .and_then(|mb| mb.parse::<usize>().ok())
            .map(|mb| mb * 1024 * 1024)
            .unwrap_or(defaults.upload_limit);

        Self {
            port,
            cors_origin,
            upload_limit,
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Pipeline configuration: defaults, then `hydroviewer.toml` in the
/// workspace, then `HYDROVIEWER_*` variables
///
/// The environment is read first so `HYDROVIEWER_WORKSPACE` decides which
/// workspace file is loaded; file values never override it.
pub fn load_layered() -> Result<LayeredConfig> {
    LayeredConfig::with_defaults().load_from_env().load_workspace_file()
}
