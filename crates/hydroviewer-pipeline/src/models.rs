use hydroviewer_core::models::{ClipTarget, Crs, RegionName};
use serde::Serialize;

/// What a boundary normalization wrote
#[derive(Debug, Clone, Serialize)]
pub struct BoundarySummary {
    /// Polygonal features kept from the input
    pub features: usize,

    /// Reference system the input was in
    pub source_crs: Crs,

    /// Area of the planar copy in square CRS units
    pub planar_area: f64,
}

/// Result of clipping one regional dataset into the project
#[derive(Debug, Clone, Serialize)]
pub struct SelectionSummary {
    pub target: ClipTarget,
    pub region: RegionName,

    /// Dataset the selection was taken from
    pub dataset: String,

    /// Features in the source dataset
    pub total: usize,

    /// Features written to the selection
    pub selected: usize,

    /// Features ignored for lacking a geometry or identifier
    pub skipped: usize,
}

/// Result of a full clip run
#[derive(Debug, Clone, Serialize)]
pub struct ClipReport {
    pub region: RegionName,
    pub drainageline: SelectionSummary,
    pub catchment: SelectionSummary,
}
