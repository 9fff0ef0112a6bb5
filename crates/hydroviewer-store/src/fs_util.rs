//! Temp-then-rename replacement of files and directories.

use hydroviewer_core::error::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

/// Create a staging directory next to `dest` so the final rename stays on
/// one filesystem
pub fn staging_dir_for(dest: &Path) -> Result<TempDir> {
    let parent = parent_of(dest);
    fs::create_dir_all(parent)?;
    Ok(tempfile::Builder::new().prefix(".staging-").tempdir_in(parent)?)
}

/// Swap a fully written staging directory into `dest`
///
/// Any previous `dest` is moved aside first and restored if the swap fails,
/// so readers see either the old tree or the new one.
pub fn replace_dir(staging: TempDir, dest: &Path) -> Result<()> {
    let aside = aside_path(dest);
    if aside.exists() {
        fs::remove_dir_all(&aside)?;
    }

    let had_previous = dest.exists();
    if had_previous {
        fs::rename(dest, &aside)?;
    }

    if let Err(e) = fs::rename(staging.path(), dest) {
        if had_previous {
            fs::rename(&aside, dest)?;
        }
        return Err(e.into());
    }

    if had_previous {
        fs::remove_dir_all(&aside)?;
    }

    // staging path no longer exists; dropping the TempDir is a no-op
    drop(staging);
    Ok(())
}

/// Write `bytes` to `dest` through a temp file in the same directory
pub fn write_file_atomic(dest: &Path, bytes: &[u8]) -> Result<()> {
    let parent = parent_of(dest);
    fs::create_dir_all(parent)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

/// Newest modification time of a file or of any entry directly in a directory
pub fn newest_mtime(path: &Path) -> Result<std::time::SystemTime> {
    let mut newest = fs::metadata(path)?.modified()?;
    if path.is_dir() {
        for entry in fs::read_dir(path)? {
            let modified = entry?.metadata()?.modified()?;
            if modified > newest {
                newest = modified;
            }
        }
    }
    Ok(newest)
}

fn parent_of(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn aside_path(dest: &Path) -> PathBuf {
    let name = dest.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    parent_of(dest).join(format!(".{}.previous", name))
}
