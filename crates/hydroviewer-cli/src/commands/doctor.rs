//! Doctor command implementation

use crate::cli::DoctorArgs;
use crate::output::OutputWriter;
use crate::output_types::{DoctorCheck, DoctorOutput};
use anyhow::Result;
use console::style;
use hydroviewer_core::config::{AppContext, LayeredConfig};
use hydroviewer_core::models::DatasetRole;
use hydroviewer_geo::transform::Reprojector;
use hydroviewer_store::GeometryStore;

const BUNDLE_ROLES: [DatasetRole; 3] =
    [DatasetRole::Boundary, DatasetRole::Drainageline, DatasetRole::Catchment];

pub fn execute(
    args: DoctorArgs,
    loaded: Result<(LayeredConfig, AppContext)>,
    output: &OutputWriter,
) -> Result<()> {
    let mut report = DoctorOutput::default();

    match loaded {
        Ok((config, ctx)) => {
            report.push(DoctorCheck::pass("Config", "Valid configuration"));
            if args.verbose && !output.is_json() {
                let mut values: Vec<_> = config.to_inspection_map().into_iter().collect();
                values.sort_by(|a, b| a.0.cmp(&b.0));
                for (key, (value, source)) in values {
                    report.note(format!("{}: {} ({:?})", key, value, source));
                }
            }
            check_context(&config, &ctx, &mut report);
        }
        Err(err) => {
            report.push(DoctorCheck::fail(
                "Config",
                format!("{:#}", err),
                "Check hydroviewer.toml and HYDROVIEWER_* variables",
            ));
        }
    }

    if output.is_json() {
        return output.result(&report);
    }

    println!("\n{}", style("Hydroviewer Health Check").bold().underlined());
    println!("{}", style("═".repeat(60)).dim());
    for line in &report.lines {
        println!("{}", line);
    }
    println!();
    println!("{}", style("═".repeat(60)).dim());
    let summary = format!("{}/{} checks passed", report.passed, report.total);
    if report.passed == report.total {
        println!("{} {}", style("✓").green().bold(), style(summary).green());
    } else {
        println!("{} {}", style("⚠").yellow().bold(), style(summary).yellow());
    }
    Ok(())
}

fn check_context(config: &LayeredConfig, ctx: &AppContext, report: &mut DoctorOutput) {
    if ctx.workspace.is_dir() {
        report.push(DoctorCheck::pass("Workspace", ctx.workspace.display().to_string()));
    } else {
        report.push(DoctorCheck::fail(
            "Workspace",
            format!("{} does not exist", ctx.workspace.display()),
            "Create it, or pass --workspace <DIR>",
        ));
    }

    let store = GeometryStore::new(&ctx.shapefile_dir);
    match store.regions() {
        Ok(regions) if regions.is_empty() => report.push(DoctorCheck::fail(
            "Geometry store",
            format!("No <region>-boundary.zip bundles in {}", ctx.shapefile_dir.display()),
            "Copy the regional bundles into the store",
        )),
        Ok(regions) => {
            let incomplete: Vec<String> = regions
                .iter()
                .filter(|region| {
                    BUNDLE_ROLES.iter().any(|role| !store.bundle_path(region, *role).is_file())
                })
                .map(|region| region.to_string())
                .collect();
            if incomplete.is_empty() {
                report.push(DoctorCheck::pass(
                    "Geometry store",
                    format!("{} regions in {}", regions.len(), ctx.shapefile_dir.display()),
                ));
            } else {
                report.push(DoctorCheck::fail(
                    "Geometry store",
                    format!("Incomplete regions: {}", incomplete.join(", ")),
                    "Each region needs boundary, drainageline and catchment bundles",
                ));
            }
        }
        Err(err) => report.push(DoctorCheck::fail(
            "Geometry store",
            err.to_string(),
            "Pass --shapefile-dir <DIR> or set shapefile_dir in hydroviewer.toml",
        )),
    }

    match Reprojector::new(&ctx.geographic_crs, &ctx.planar_crs) {
        Ok(_) => report.push(DoctorCheck::pass(
            "PROJ",
            format!("{} -> {}", ctx.geographic_crs, ctx.planar_crs),
        )),
        Err(err) => report.push(DoctorCheck::fail(
            "PROJ",
            err.to_string(),
            "Install PROJ with its EPSG database",
        )),
    }

    match config.map_server_target() {
        Some(target) => report.push(DoctorCheck::pass(
            "GeoServer",
            format!("{} (workspace {})", target.url, target.workspace),
        )),
        None => report.push(DoctorCheck::fail(
            "GeoServer",
            "Not configured",
            "Set [geoserver] url in hydroviewer.toml, or pass --url to export geoserver",
        )),
    }
}
