//! Hydroviewer Pipeline - Boundary to published hydroviewer
//!
//! This crate implements the project use cases: normalizing a boundary,
//! resolving the region it falls in, clipping that region's drainage lines and
//! catchments, and publishing the selections. Each stage persists its output
//! in the project directory before the next one reads it.

pub mod atlas;
pub mod catchment;
pub mod geoserver;
pub mod models;
pub mod network;
pub mod normalizer;
pub mod pipeline;
pub mod publish;
pub mod resolver;

pub use atlas::LivingAtlasClient;
pub use catchment::CatchmentSelector;
pub use geoserver::GeoServerClient;
pub use models::{BoundarySummary, ClipReport, SelectionSummary};
pub use network::NetworkSelector;
pub use normalizer::BoundaryNormalizer;
pub use pipeline::ClipPipeline;
pub use resolver::RegionResolver;
