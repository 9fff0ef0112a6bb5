//! Command implementations

mod boundary;
mod clip;
mod doctor;
mod export;
mod project;
mod regions;
mod resolve;

use crate::cli::{Cli, Commands};
use crate::config_loader;
use crate::output::OutputWriter;
use anyhow::Result;
use hydroviewer_core::config::{AppContext, LayeredConfig};

/// Execute a CLI command
pub async fn execute(cli: Cli, output: &OutputWriter) -> Result<()> {
    let loaded = config_loader::load_context(&cli);

    match cli.command {
        // Doctor reports a broken configuration instead of failing on it
        Commands::Doctor(args) => doctor::execute(args, loaded, output),
        command => {
            let (config, ctx) = loaded?;
            tracing::debug!(workspace = %ctx.workspace.display(), "Loaded configuration");
            dispatch(command, &config, &ctx, output).await
        }
    }
}

async fn dispatch(
    command: Commands,
    config: &LayeredConfig,
    ctx: &AppContext,
    output: &OutputWriter,
) -> Result<()> {
    match command {
        Commands::Project(args) => project::execute(args, ctx, output),
        Commands::Boundary(args) => boundary::execute(args, ctx, output).await,
        Commands::Resolve(args) => resolve::execute(args, ctx, output),
        Commands::Clip(args) => clip::execute(args, ctx, output),
        Commands::Run(args) => clip::run(args, ctx, output),
        Commands::Export(args) => export::execute(args, config, ctx, output).await,
        Commands::Regions(args) => regions::execute(args, ctx, output),
        Commands::Doctor(args) => doctor::execute(args, Ok((config.clone(), ctx.clone())), output),
    }
}
