//! Regional geometry store
//!
//! A flat directory of zipped shapefiles, three per region:
//! `<region>-boundary.zip`, `<region>-drainageline.zip` and
//! `<region>-catchment.zip`. Bundles are extracted into a temporary
//! directory for reading and never modified.

use hydroviewer_core::error::{HydroviewerError, Result};
use hydroviewer_core::models::{Crs, DatasetRole, RegionName};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::shapefile_io::{Layer, REQUIRED_COMPONENTS};

const BUNDLE_EXTENSION: &str = "zip";

/// Read-only access to the regional bundles
#[derive(Debug, Clone)]
pub struct GeometryStore {
    root: PathBuf,
}

impl GeometryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Regions with a boundary bundle, in directory-listing order
    ///
    /// The order is whatever the filesystem returns and is not sorted.
    pub fn regions(&self) -> Result<Vec<RegionName>> {
        let suffix = format!("-{}.{}", DatasetRole::Boundary.token(), BUNDLE_EXTENSION);
        let entries = fs::read_dir(&self.root).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                HydroviewerError::prerequisite(
                    format!("geometry store at {}", self.root.display()),
                    "Set shapefile_dir in hydroviewer.toml or HYDROVIEWER_SHAPEFILE_DIR",
                )
            } else {
                e.into()
            }
        })?;

        let mut regions = Vec::new();
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if file_name.ends_with(&suffix) && entry.path().is_file() {
                let stem = &file_name[..file_name.len() - BUNDLE_EXTENSION.len() - 1];
                regions.push(RegionName::new(stem));
            }
        }
        Ok(regions)
    }

    /// Path of the bundle holding `region`'s dataset for `role`
    pub fn bundle_path(&self, region: &RegionName, role: DatasetRole) -> PathBuf {
        self.root.join(format!("{}.{}", region.dataset_name(role), BUNDLE_EXTENSION))
    }

    /// Extract a region's dataset, failing with `RegionNotFound` if the
    /// bundle does not exist
    pub fn open(&self, region: &RegionName, role: DatasetRole) -> Result<ExtractedDataset> {
        let name = region.dataset_name(role);
        let path = self.bundle_path(region, role);
        if !path.is_file() {
            return Err(HydroviewerError::RegionNotFound { name, path });
        }
        ExtractedDataset::extract(&path, &name)
    }
}

/// A bundle unpacked into a temporary directory, removed on drop
#[derive(Debug)]
pub struct ExtractedDataset {
    name: String,
    shp: PathBuf,
    _dir: TempDir,
}

impl ExtractedDataset {
    fn extract(bundle: &Path, name: &str) -> Result<Self> {
        let archive_error = |message: String| HydroviewerError::Archive {
            path: bundle.to_path_buf(),
            message,
        };

        let file = File::open(bundle)?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| archive_error(format!("Failed to open bundle: {}", e)))?;

        let dir = TempDir::new()?;
        let mut shp = None;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| archive_error(format!("Failed to read entry {}: {}", i, e)))?;
            if entry.is_dir() {
                continue;
            }
            // Flatten: bundles sometimes nest the shapefile in a folder
            let Some(file_name) = entry
                .enclosed_name()
                .and_then(|p| p.file_name().map(PathBuf::from))
            else {
                tracing::warn!(
                    bundle = %bundle.display(),
                    entry = entry.name(),
                    "Skipping unsafe archive entry"
                );
                continue;
            };

            let out_path = dir.path().join(&file_name);
            let mut out = File::create(&out_path)?;
            io::copy(&mut entry, &mut out)?;

            let is_shp = out_path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("shp"))
                .unwrap_or(false);
            if is_shp {
                shp = Some(pick_shp(shp, out_path, name));
            }
        }

        let shp = shp.ok_or_else(|| {
            archive_error(format!(
                "Bundle contains no .shp file (expected {})",
                REQUIRED_COMPONENTS.map(|ext| format!("{}.{}", name, ext)).join(", ")
            ))
        })?;

        tracing::debug!(
            bundle = %bundle.display(),
            shp = %shp.display(),
            "Extracted dataset bundle"
        );

        Ok(Self {
            name: name.to_string(),
            shp,
            _dir: dir,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shp_path(&self) -> &Path {
        &self.shp
    }

    /// Read the extracted shapefile
    pub fn read_layer(&self, default_crs: &Crs) -> Result<Layer> {
        Layer::read(&self.shp, default_crs)
    }
}

/// Prefer the `.shp` whose stem matches the dataset name
fn pick_shp(current: Option<PathBuf>, candidate: PathBuf, name: &str) -> PathBuf {
    let matches_name = |p: &Path| p.file_stem().and_then(|s| s.to_str()) == Some(name);
    match current {
        Some(existing) if matches_name(&existing) || !matches_name(&candidate) => existing,
        _ => candidate,
    }
}
