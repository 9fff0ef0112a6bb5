//! Uploaded shapefile bundles.

use hydroviewer_core::error::{HydroviewerError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const REQUIRED: [&str; 3] = ["shp", "shx", "dbf"];
const OPTIONAL: [&str; 2] = ["prj", "cpg"];

/// A file received from a client
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its file name
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| HydroviewerError::InvalidUpload {
                reason: format!("'{}' has no usable file name", path.display()),
            })?
            .to_string();
        Ok(Self {
            file_name,
            bytes: fs::read(path)?,
        })
    }

    fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}

/// A validated shapefile upload, keyed by lowercase extension
#[derive(Debug, Clone)]
pub struct UploadSet {
    files: BTreeMap<String, UploadedFile>,
}

impl UploadSet {
    /// Accept exactly one `.shp`, `.shx` and `.dbf`, plus at most one
    /// `.prj` and `.cpg`
    pub fn validate(files: Vec<UploadedFile>) -> Result<Self> {
        let invalid = |reason: String| HydroviewerError::InvalidUpload { reason };

        let mut by_ext: BTreeMap<String, UploadedFile> = BTreeMap::new();
        for file in files {
            let ext = file
                .extension()
                .ok_or_else(|| invalid(format!("'{}' has no file extension", file.file_name)))?;
            if !REQUIRED.contains(&ext.as_str()) && !OPTIONAL.contains(&ext.as_str()) {
                return Err(invalid(format!(
                    "'{}' is not a shapefile component (.shp, .shx, .dbf, .prj, .cpg)",
                    file.file_name
                )));
            }
            if by_ext.contains_key(&ext) {
                return Err(invalid(format!("more than one .{} file uploaded", ext)));
            }
            by_ext.insert(ext, file);
        }

        let missing: Vec<String> = REQUIRED
            .iter()
            .filter(|ext| !by_ext.contains_key(**ext))
            .map(|ext| format!(".{}", ext))
            .collect();
        if !missing.is_empty() {
            return Err(invalid(format!("missing required files: {}", missing.join(", "))));
        }

        Ok(Self { files: by_ext })
    }

    pub fn has_prj(&self) -> bool {
        self.files.contains_key("prj")
    }

    /// Write every component as `<stem>.<ext>` into `dir`, returning the
    /// `.shp` path
    pub fn write_to(&self, dir: &Path, stem: &str) -> Result<PathBuf> {
        for (ext, file) in &self.files {
            fs::write(dir.join(format!("{}.{}", stem, ext)), &file.bytes)?;
        }
        Ok(dir.join(format!("{}.shp", stem)))
    }
}
