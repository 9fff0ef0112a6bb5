//! Clip and run command implementations

use crate::cli::{ClipArgs, ClipOnly, RunArgs};
use crate::output::OutputWriter;
use crate::progress::with_spinner;
use anyhow::Result;
use hydroviewer_core::config::AppContext;
use hydroviewer_core::models::{ClipTarget, ProjectDir, RegionName};
use hydroviewer_pipeline::{ClipPipeline, ClipReport, SelectionSummary};
use hydroviewer_store::ProjectStore;

pub fn execute(args: ClipArgs, ctx: &AppContext, output: &OutputWriter) -> Result<()> {
    let project = ProjectStore::new(ctx.projects_dir()).open(&args.project)?;
    let region = args.region.as_deref().map(RegionName::from_input).transpose()?;
    let pipeline = ClipPipeline::new(ctx);

    let Some(only) = args.only else {
        let report = clip_all(&pipeline, &project, region, output)?;
        return output.result(&report);
    };

    let target = match only {
        ClipOnly::Drainageline => ClipTarget::Drainageline,
        ClipOnly::Catchment => ClipTarget::Catchment,
    };
    let summary = with_spinner(
        &format!("Clipping {}...", target),
        output.is_json(),
        |summary: &SelectionSummary| format!("Selected {} of {}", summary.selected, summary.total),
        || pipeline.clip(&project, region, target),
    )?;

    print_selection(&summary, output);
    output.result(&summary)
}

pub fn run(args: RunArgs, ctx: &AppContext, output: &OutputWriter) -> Result<()> {
    let project = ProjectStore::new(ctx.projects_dir()).open(&args.project)?;
    let region = args.region.as_deref().map(RegionName::from_input).transpose()?;
    let pipeline = ClipPipeline::new(ctx);

    let report = clip_all(&pipeline, &project, region, output)?;
    output.info(format!("Next: hydroviewer export {} zip", project.name));
    output.result(&report)
}

fn clip_all(
    pipeline: &ClipPipeline,
    project: &ProjectDir,
    region: Option<RegionName>,
    output: &OutputWriter,
) -> Result<ClipReport> {
    let report = with_spinner(
        "Clipping drainage lines and catchments...",
        output.is_json(),
        |report: &ClipReport| format!("Clipped from {}", report.region.display_name()),
        || pipeline.run(project, region),
    )?;

    output.section(format!("Region {}", report.region.display_name()));
    print_selection(&report.drainageline, output);
    print_selection(&report.catchment, output);
    Ok(report)
}

fn print_selection(summary: &SelectionSummary, output: &OutputWriter) {
    let mut line = format!(
        "{} of {} features from {}",
        summary.selected, summary.total, summary.dataset
    );
    if summary.skipped > 0 {
        line.push_str(&format!(" ({} skipped)", summary.skipped));
    }
    output.kv(summary.target, line);
}
