//! Boundary normalization
//!
//! Whatever form a boundary arrives in, it is stored twice: a geographic copy
//! (`boundaries.json`) for display and a planar copy
//! (`projected_selections/`) for clipping. Both are derived from the same
//! input in the same call, and both are replaced as a whole.

use hydroviewer_core::config::AppContext;
use hydroviewer_core::error::{HydroviewerError, Result};
use hydroviewer_core::models::{Crs, ProjectDir, PROJECTED_DIR};
use hydroviewer_core::ports::AtlasSource;
use hydroviewer_geo::transform::reproject_boundary;
use hydroviewer_geo::validation::validate_boundary;
use hydroviewer_geo::Boundary;
use hydroviewer_store::boundary_files;
use hydroviewer_store::shapefile_io::Layer;
use hydroviewer_store::{UploadSet, UploadedFile};

use crate::models::BoundarySummary;

/// Turns user-supplied boundaries into the project's boundary artifacts
#[derive(Debug, Clone)]
pub struct BoundaryNormalizer {
    planar_crs: Crs,
    geographic_crs: Crs,
}

impl BoundaryNormalizer {
    pub fn new(planar_crs: Crs, geographic_crs: Crs) -> Self {
        Self {
            planar_crs,
            geographic_crs,
        }
    }

    pub fn from_context(ctx: &AppContext) -> Self {
        Self::new(ctx.planar_crs.clone(), ctx.geographic_crs.clone())
    }

    /// Store a boundary given as GeoJSON text
    pub fn from_geojson(&self, project: &ProjectDir, text: &str) -> Result<BoundarySummary> {
        let boundary = Boundary::from_geojson_str(text)?;
        tracing::info!(
            project = %project.name,
            features = boundary.features.len(),
            crs = %boundary.crs,
            "Parsed GeoJSON boundary"
        );
        self.persist(project, boundary)
    }

    /// Store an uploaded shapefile as the boundary
    ///
    /// The components are renamed into a scratch directory first, so the
    /// upload's own file names never reach the project.
    pub fn from_shapefile(
        &self,
        project: &ProjectDir,
        files: Vec<UploadedFile>,
    ) -> Result<BoundarySummary> {
        let upload = UploadSet::validate(files)?;
        if !upload.has_prj() {
            tracing::warn!(
                project = %project.name,
                "Uploaded shapefile has no .prj, assuming {}",
                self.geographic_crs
            );
        }

        let scratch = tempfile::TempDir::new()?;
        let shp = upload.write_to(scratch.path(), PROJECTED_DIR)?;
        let layer = Layer::read(&shp, &self.geographic_crs).map_err(|e| match e {
            HydroviewerError::Shapefile { message, .. } => HydroviewerError::InvalidUpload {
                reason: format!("Unreadable shapefile: {}", message),
            },
            other => other,
        })?;
        let boundary = boundary_files::boundary_from_layer(&layer)?;

        tracing::info!(
            project = %project.name,
            features = boundary.features.len(),
            crs = %boundary.crs,
            "Read uploaded shapefile boundary"
        );
        self.persist(project, boundary)
    }

    /// Validate, reproject, and write both boundary copies
    fn persist(&self, project: &ProjectDir, boundary: Boundary) -> Result<BoundarySummary> {
        validate_boundary(&boundary)?;

        let planar = reproject_boundary(&boundary, &self.planar_crs)?;
        let geographic = reproject_boundary(&boundary, &self.geographic_crs)?;

        boundary_files::write_planar(project, &planar)?;
        boundary_files::write_geographic(project, &geographic)?;

        let summary = BoundarySummary {
            features: boundary.features.len(),
            source_crs: boundary.crs,
            planar_area: planar.unsigned_area(),
        };
        tracing::info!(
            project = %project.name,
            features = summary.features,
            planar_area = summary.planar_area,
            "Stored project boundary"
        );
        Ok(summary)
    }
}

/// Fetch a named Living Atlas region as GeoJSON text
///
/// Names outside the source's list are rejected before any request is made.
pub async fn fetch_atlas_boundary(atlas: &dyn AtlasSource, region: &str) -> Result<String> {
    if !atlas.region_names().iter().any(|name| *name == region) {
        return Err(HydroviewerError::InvalidBoundary {
            reason: format!("'{}' is not a Living Atlas world region", region),
        });
    }
    tracing::info!(region = %region, "Fetching Living Atlas region");
    atlas.fetch_region_geojson(region).await
}
