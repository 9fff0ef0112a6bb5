//! Port trait definitions
//!
//! These traits define the external collaborators the pipeline talks to.

pub mod collaborators;

pub use collaborators::{AtlasSource, MapServer};
