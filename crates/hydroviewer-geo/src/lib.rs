//! Hydroviewer Geo - Boundaries, CRS transformations, and spatial selection
//!
//! This crate handles the geometric side of the pipeline: parsing and
//! validating project boundaries, reprojecting between the geographic and
//! planar reference systems, and the representative-point selection used to
//! clip river networks.

pub mod models;
pub mod spatial;
pub mod transform;
pub mod validation;

pub use models::{Boundary, BoundaryFeature};
pub use transform::Reprojector;
