//! Regions command implementation

use crate::cli::RegionsArgs;
use crate::output::OutputWriter;
use crate::output_types::RegionRow;
use anyhow::Result;
use hydroviewer_core::config::AppContext;
use hydroviewer_pipeline::atlas::ATLAS_REGIONS;
use hydroviewer_store::GeometryStore;

pub fn execute(args: RegionsArgs, ctx: &AppContext, output: &OutputWriter) -> Result<()> {
    if args.atlas {
        if output.is_json() {
            return output.result(ATLAS_REGIONS);
        }
        output.section("Living Atlas regions");
        for region in ATLAS_REGIONS {
            println!("  {}", region);
        }
        return Ok(());
    }

    let store = GeometryStore::new(&ctx.shapefile_dir);
    let rows: Vec<RegionRow> = store.regions()?.into_iter().map(RegionRow::from).collect();
    if rows.is_empty() && !output.is_json() {
        output.warning(format!("No regions in {}", ctx.shapefile_dir.display()));
        return Ok(());
    }
    output.table(rows)
}
