//! Publishing a project's selections: a download archive, map-server
//! layers, and a standalone HTML viewer.

pub mod archive;
pub mod html;
pub mod mapserver;

use hydroviewer_core::error::{HydroviewerError, Result};
use hydroviewer_core::models::{ClipTarget, ProjectDir};

pub use archive::{build_archive, zip_selection, ArchiveOutcome};
pub use html::render_viewer;
pub use mapserver::publish_to_map_server;

/// Publishing order of the two selections
pub const PUBLISHED_TARGETS: [ClipTarget; 2] = [ClipTarget::Catchment, ClipTarget::Drainageline];

/// Fail unless both selections have been written
pub(crate) fn require_selections(project: &ProjectDir) -> Result<()> {
    for target in PUBLISHED_TARGETS {
        if !project.selection_dir(target).is_dir() {
            return Err(HydroviewerError::prerequisite(
                format!("{} selection for project '{}'", target, project.name),
                "Clip both drainage lines and catchments before publishing",
            ));
        }
    }
    Ok(())
}
