//! Project command implementation

use crate::cli::{DeleteArgs, ProjectArgs, ProjectCommand, ProjectRef};
use crate::output::OutputWriter;
use crate::output_types::{ProjectOutput, ProjectRow};
use anyhow::{bail, Result};
use console::Term;
use dialoguer::Confirm;
use hydroviewer_core::config::AppContext;
use hydroviewer_store::ProjectStore;

pub fn execute(args: ProjectArgs, ctx: &AppContext, output: &OutputWriter) -> Result<()> {
    let store = ProjectStore::new(ctx.projects_dir());

    match args.command {
        ProjectCommand::New(args) => create(args, &store, output),
        ProjectCommand::List => list(&store, output),
        ProjectCommand::Delete(args) => delete(args, &store, output),
        ProjectCommand::Status(args) => status(args, &store, output),
    }
}

fn create(args: ProjectRef, store: &ProjectStore, output: &OutputWriter) -> Result<()> {
    let project = store.create(&args.project)?;

    output.success(format!("Created project {}", project.name));
    output.kv("Title", project.name.title());
    output.kv("Location", project.path().display());
    output.info(format!(
        "Next: hydroviewer boundary set {} --geojson <FILE>",
        project.name
    ));

    output.result(ProjectOutput {
        name: project.name.to_string(),
        title: project.name.title(),
        path: project.path().display().to_string(),
    })
}

fn list(store: &ProjectStore, output: &OutputWriter) -> Result<()> {
    let mut rows = Vec::new();
    for name in store.list()? {
        let project = store.open(name.as_str())?;
        rows.push(ProjectRow::from(&store.state(&project)?));
    }
    output.table(rows)
}

fn delete(args: DeleteArgs, store: &ProjectStore, output: &OutputWriter) -> Result<()> {
    let project = store.open(&args.project)?;

    if !args.yes {
        if !Term::stderr().is_term() {
            bail!(
                "Refusing to delete {} without --yes when not attached to a terminal",
                project.name
            );
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete project {} and all of its files?", project.name))
            .default(false)
            .interact()?;
        if !confirmed {
            output.info("Cancelled");
            return Ok(());
        }
    }

    store.delete(project.name.as_str())?;
    output.success(format!("Deleted project {}", project.name));
    output.result(serde_json::json!({ "deleted": project.name }))
}

fn status(args: ProjectRef, store: &ProjectStore, output: &OutputWriter) -> Result<()> {
    let project = store.open(&args.project)?;
    let state = store.state(&project)?;

    if output.is_json() {
        return output.result(&state);
    }

    output.section(format!("Project {}", state.title));
    output.kv("Location", project.path().display());
    output.kv("Boundary", step(state.boundaries));
    output.kv("Planar boundary", step(state.projected_boundary));
    if let Some(updated) = state.boundaries_updated_at {
        output.kv("Boundary updated", updated.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    output.kv("Drainage lines", step(state.drainageline));
    output.kv("Catchments", step(state.catchment));
    output.kv("Archive", step(state.archive));
    output.kv("Viewer", step(state.html));

    match &state.geoserver {
        Some(geoserver) => {
            output.section("GeoServer");
            output.kv("WMS", &geoserver.url);
            output.kv("Workspace", &geoserver.workspace);
            output.kv("Drainage layer", &geoserver.dl_layer);
            output.kv("Catchment layer", &geoserver.ctch_layer);
        }
        None => output.kv("GeoServer", "not published"),
    }
    Ok(())
}

fn step(done: bool) -> &'static str {
    if done {
        "done"
    } else {
        "missing"
    }
}
