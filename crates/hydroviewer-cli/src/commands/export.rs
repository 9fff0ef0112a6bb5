//! Export command implementation

use crate::cli::{ExportArgs, ExportTarget, GeoserverArgs};
use crate::errors::CliError;
use crate::output::OutputWriter;
use crate::output_types::ExportOutput;
use crate::progress::{create_spinner, finish_error, finish_success, with_spinner};
use anyhow::{bail, Result};
use hydroviewer_core::config::{AppContext, LayeredConfig};
use hydroviewer_core::models::{MapServerTarget, PartOutcome, ProjectDir};
use hydroviewer_pipeline::publish::{
    build_archive, publish_to_map_server, render_viewer, ArchiveOutcome, PUBLISHED_TARGETS,
};
use hydroviewer_pipeline::GeoServerClient;
use hydroviewer_store::ProjectStore;

pub async fn execute(
    args: ExportArgs,
    config: &LayeredConfig,
    ctx: &AppContext,
    output: &OutputWriter,
) -> Result<()> {
    let project = ProjectStore::new(ctx.projects_dir()).open(&args.project)?;

    match args.target {
        ExportTarget::Zip => zip(&project, output),
        ExportTarget::Html => html(&project, ctx, output),
        ExportTarget::Geoserver(args) => {
            let target = merge_target(config.map_server_target(), args)?;
            geoserver(&project, &target, output).await
        }
    }
}

fn zip(project: &ProjectDir, output: &OutputWriter) -> Result<()> {
    let outcome = with_spinner(
        "Building archive...",
        output.is_json(),
        |outcome: &ArchiveOutcome| {
            let message = if outcome.reused {
                "Archive is up to date"
            } else {
                "Archive built"
            };
            message.to_string()
        },
        || build_archive(project),
    )?;

    output.kv("Archive", outcome.path.display());
    output.result(ExportOutput {
        path: outcome.path.display().to_string(),
        reused: Some(outcome.reused),
    })
}

fn html(project: &ProjectDir, ctx: &AppContext, output: &OutputWriter) -> Result<()> {
    let path = render_viewer(project, ctx)?;

    output.success("Viewer rendered");
    output.kv("Viewer", path.display());
    output.result(ExportOutput {
        path: path.display().to_string(),
        reused: None,
    })
}

async fn geoserver(
    project: &ProjectDir,
    target: &MapServerTarget,
    output: &OutputWriter,
) -> Result<()> {
    let client = GeoServerClient::new();
    let pb = create_spinner(&format!("Publishing to {}...", target.url), output.is_json());
    let report = match publish_to_map_server(project, &client, target).await {
        Ok(report) => report,
        Err(err) => {
            finish_error(&pb, "Publishing failed");
            return Err(err.into());
        }
    };

    if report.any_succeeded() {
        finish_success(&pb, &format!("Published to workspace {}", target.workspace));
    } else {
        finish_error(&pb, "No layer was published");
    }

    let mut failures = Vec::new();
    for clip_target in PUBLISHED_TARGETS {
        let layer = target.layer_for(clip_target);
        match report.outcome(clip_target) {
            PartOutcome::Succeeded => output.kv(layer, "published"),
            PartOutcome::Failed { reason } => {
                output.kv(layer, format!("failed: {}", reason));
                failures.push(format!("{}: {}", layer, reason));
            }
        }
    }

    if !report.any_succeeded() {
        bail!(CliError::new("No layer was published")
            .with_context(failures.join("\n"))
            .with_suggestion("Check the GeoServer URL and credentials")
            .with_help("Run: hydroviewer doctor"));
    }
    if !report.all_succeeded() {
        output.warning("Only some layers were published; the viewer will be missing the rest");
    }
    output.result(&report)
}

/// Overlay command-line flags on the configured GeoServer target
fn merge_target(
    configured: Option<MapServerTarget>,
    args: GeoserverArgs,
) -> Result<MapServerTarget> {
    let mut target = match (args.url, configured) {
        (Some(url), Some(mut configured)) => {
            configured.url = url;
            configured
        }
        (Some(url), None) => MapServerTarget::with_defaults(url),
        (None, Some(configured)) => configured,
        (None, None) => bail!(CliError::new("No GeoServer URL")
            .with_suggestion("Pass --url http://<host>/geoserver/rest/")
            .with_suggestion("Or set [geoserver] url in hydroviewer.toml")),
    };

    if let Some(username) = args.username {
        target.username = username;
    }
    if let Some(password) = args.password {
        target.password = password;
    }
    if let Some(workspace) = args.geoserver_workspace {
        target.workspace = workspace;
    }
    Ok(target)
}
