//! Hydroviewer API - HTTP interface to the hydroviewer pipeline
//!
//! Every route maps onto one pipeline operation on one project. Filesystem
//! and geoprocessing work runs on the blocking pool; collaborator calls are
//! awaited directly.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::ApiConfig;
pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;
