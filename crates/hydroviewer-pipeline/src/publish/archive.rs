//! Zip packaging of the selections.

use hydroviewer_core::error::{HydroviewerError, Result};
use hydroviewer_core::models::project::selection_layout;
use hydroviewer_core::models::{ClipTarget, ProjectDir};
use hydroviewer_store::fs_util;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::{require_selections, PUBLISHED_TARGETS};

/// The project's download archive
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveOutcome {
    pub path: PathBuf,

    /// An existing archive newer than both selections was served as is
    pub reused: bool,
}

/// Build `hydroviewer_shapefiles.zip` with both selections under their
/// directory names
///
/// An archive newer than both selection directories is reused. A new one is
/// written to a temp file and renamed, so a failed build leaves none behind.
pub fn build_archive(project: &ProjectDir) -> Result<ArchiveOutcome> {
    require_selections(project)?;

    let path = project.archive();
    if is_fresh(project, &path)? {
        tracing::debug!(project = %project.name, "Reusing existing archive");
        return Ok(ArchiveOutcome { path, reused: true });
    }

    let archive_error = |message: String| HydroviewerError::Archive {
        path: path.clone(),
        message,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(project.path())?;
    {
        let mut zip = ZipWriter::new(tmp.as_file_mut());
        for target in PUBLISHED_TARGETS {
            let (dir_name, _) = selection_layout(target);
            for component in components(&project.selection_dir(target))? {
                let name = component
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                add_file(&mut zip, &format!("{}/{}", dir_name, name), &component)
                    .map_err(|e| archive_error(e.to_string()))?;
            }
        }
        zip.finish().map_err(|e| archive_error(e.to_string()))?;
    }
    tmp.persist(&path).map_err(|e| e.error)?;

    tracing::info!(project = %project.name, path = %path.display(), "Built shapefile archive");
    Ok(ArchiveOutcome {
        path,
        reused: false,
    })
}

/// Zip one selection in memory, renaming its components to `<name>.<ext>`
///
/// Map servers name the published layer after the shapefile inside the
/// archive.
pub fn zip_selection(project: &ProjectDir, target: ClipTarget, name: &str) -> Result<Vec<u8>> {
    let dir = project.selection_dir(target);
    let archive_error = |message: String| HydroviewerError::Archive {
        path: dir.clone(),
        message,
    };

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buffer);
        for component in components(&dir)? {
            let ext = component.extension().and_then(|e| e.to_str()).unwrap_or_default();
            add_file(&mut zip, &format!("{}.{}", name, ext), &component)
                .map_err(|e| archive_error(e.to_string()))?;
        }
        zip.finish().map_err(|e| archive_error(e.to_string()))?;
    }
    Ok(buffer.into_inner())
}

fn is_fresh(project: &ProjectDir, archive: &Path) -> Result<bool> {
    if !archive.exists() {
        return Ok(false);
    }
    let built = fs::metadata(archive)?.modified()?;
    for target in PUBLISHED_TARGETS {
        if fs_util::newest_mtime(&project.selection_dir(target))? >= built {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Regular files of a selection directory, sorted by name
fn components(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn add_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    source: &Path,
) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    zip.start_file(name, SimpleFileOptions::default())?;
    let mut file = File::open(source)?;
    std::io::copy(&mut file, zip)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydroviewer_core::models::ProjectName;
    use std::io::Read;
    use tempfile::TempDir;

    fn project_with_selections(root: &TempDir) -> ProjectDir {
        let project = ProjectDir::new(
            ProjectName::parse("demo").unwrap(),
            root.path().join("demo"),
        );
        for target in PUBLISHED_TARGETS {
            let (dir, stem) = selection_layout(target);
            let dir = project.path().join(dir);
            fs::create_dir_all(&dir).unwrap();
            for ext in ["shp", "shx", "dbf", "prj"] {
                fs::write(dir.join(format!("{}.{}", stem, ext)), ext.as_bytes()).unwrap();
            }
        }
        project
    }

    fn entry_names(path: &Path) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut names: Vec<String> =
            (0..archive.len()).map(|i| archive.by_index(i).unwrap().name().to_string()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_archive_layout() {
        let root = TempDir::new().unwrap();
        let project = project_with_selections(&root);

        let outcome = build_archive(&project).unwrap();
        assert!(!outcome.reused);

        let names = entry_names(&outcome.path);
        assert_eq!(names.len(), 8);
        assert!(names.contains(&"selected_catchment/catchment_select.shp".to_string()));
        assert!(names.contains(&"selected_drainageline/drainageline_select.dbf".to_string()));
    }

    #[test]
    fn test_fresh_archive_is_reused() {
        let root = TempDir::new().unwrap();
        let project = project_with_selections(&root);
        build_archive(&project).unwrap();

        // Make the selections clearly older than the archive
        let old = std::time::SystemTime::now() - std::time::Duration::from_secs(3600);
        for target in PUBLISHED_TARGETS {
            let dir = project.selection_dir(target);
            for component in components(&dir).unwrap() {
                File::options().write(true).open(&component).unwrap().set_modified(old).unwrap();
            }
            File::open(&dir).unwrap().set_modified(old).unwrap();
        }

        assert!(build_archive(&project).unwrap().reused);
    }

    #[test]
    fn test_missing_selection_is_prerequisite_error() {
        let root = TempDir::new().unwrap();
        let project = ProjectDir::new(
            ProjectName::parse("empty").unwrap(),
            root.path().join("empty"),
        );
        fs::create_dir_all(project.path()).unwrap();
        assert!(matches!(
            build_archive(&project),
            Err(HydroviewerError::PrerequisiteMissing { .. })
        ));
        assert!(!project.archive().exists());
    }

    #[test]
    fn test_zip_selection_renames_components() {
        let root = TempDir::new().unwrap();
        let project = project_with_selections(&root);
        let bytes = zip_selection(&project, ClipTarget::Catchment, "catchments").unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut shp = archive.by_name("catchments.shp").unwrap();
        let mut content = String::new();
        shp.read_to_string(&mut content).unwrap();
        assert_eq!(content, "shp");
    }
}
