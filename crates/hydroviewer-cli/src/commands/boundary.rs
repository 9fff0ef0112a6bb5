//! Boundary command implementation

use crate::cli::{BoundaryArgs, BoundaryCommand, BoundarySetArgs};
use crate::output::OutputWriter;
use crate::progress::{create_spinner, finish_error, finish_success, with_spinner};
use anyhow::{Context, Result};
use hydroviewer_core::config::AppContext;
use hydroviewer_pipeline::normalizer::fetch_atlas_boundary;
use hydroviewer_pipeline::{BoundaryNormalizer, BoundarySummary, LivingAtlasClient};
use hydroviewer_store::{ProjectStore, UploadedFile};
use std::fs;

pub async fn execute(args: BoundaryArgs, ctx: &AppContext, output: &OutputWriter) -> Result<()> {
    match args.command {
        BoundaryCommand::Set(args) => set(args, ctx, output).await,
    }
}

async fn set(args: BoundarySetArgs, ctx: &AppContext, output: &OutputWriter) -> Result<()> {
    let store = ProjectStore::new(ctx.projects_dir());
    let project = store.open(&args.project)?;
    let normalizer = BoundaryNormalizer::from_context(ctx);

    let text = if let Some(path) = &args.geojson {
        Some(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        )
    } else if let Some(region) = &args.atlas {
        let client = LivingAtlasClient::new(ctx.atlas_url.clone());
        let pb = create_spinner(
            &format!("Fetching {} from Living Atlas...", region),
            output.is_json(),
        );
        match fetch_atlas_boundary(&client, region).await {
            Ok(text) => {
                finish_success(&pb, &format!("Fetched {}", region));
                Some(text)
            }
            Err(err) => {
                finish_error(&pb, &format!("Could not fetch {}", region));
                return Err(err.into());
            }
        }
    } else {
        None
    };

    let summary = with_spinner(
        "Normalizing boundary...",
        output.is_json(),
        |summary: &BoundarySummary| format!("Normalized {} features", summary.features),
        || match &text {
            Some(text) => normalizer.from_geojson(&project, text),
            None => {
                let files = args
                    .shapefile
                    .iter()
                    .map(|path| UploadedFile::from_path(path))
                    .collect::<hydroviewer_core::Result<Vec<_>>>()?;
                normalizer.from_shapefile(&project, files)
            }
        },
    )?;

    output.success(format!("Boundary set for {}", project.name));
    output.kv("Features", summary.features);
    output.kv("Source CRS", &summary.source_crs);
    output.kv("Planar area", format!("{:.0} m²", summary.planar_area));
    output.info(format!("Next: hydroviewer run {}", project.name));

    output.result(&summary)
}
