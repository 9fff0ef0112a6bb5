//! Resolve command implementation

use crate::cli::ProjectRef;
use crate::output::OutputWriter;
use crate::output_types::ResolveOutput;
use anyhow::Result;
use hydroviewer_core::config::AppContext;
use hydroviewer_pipeline::ClipPipeline;
use hydroviewer_store::ProjectStore;

pub fn execute(args: ProjectRef, ctx: &AppContext, output: &OutputWriter) -> Result<()> {
    let project = ProjectStore::new(ctx.projects_dir()).open(&args.project)?;
    let region = ClipPipeline::new(ctx).resolve(&project)?;

    output.success(format!("{} lies in {}", project.name, region.display_name()));
    output.kv("Region", &region);

    output.result(ResolveOutput {
        display_name: region.display_name(),
        project: project.name,
        region,
    })
}
