//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use hydroviewer_core::config::{AppContext, CliConfigOverrides, LayeredConfig};

use crate::cli::Cli;

/// Load layered configuration: defaults, environment, and global flags
/// decide the workspace, whose `hydroviewer.toml` then fills in the rest
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults().load_from_env();
    config.update_from_cli(CliConfigOverrides {
        workspace: cli.workspace.clone(),
        shapefile_dir: cli.shapefile_dir.clone(),
        geoserver_url: None,
    });

    config.load_workspace_file().context("Failed to load configuration file")
}

/// Load the configuration and resolve it into a context
pub fn load_context(cli: &Cli) -> Result<(LayeredConfig, AppContext)> {
    let config = load_config(cli)?;
    let ctx = config.to_context()?;
    Ok((config, ctx))
}
