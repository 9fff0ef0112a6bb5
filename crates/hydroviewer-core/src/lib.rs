//! Hydroviewer Core - Domain models, project layout, and configuration
//!
//! This crate contains the core domain types and collaborator port definitions
//! shared by the geoprocessing pipeline, the HTTP API, and the CLI.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{HydroviewerError, Result};
