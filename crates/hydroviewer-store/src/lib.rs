//! Hydroviewer Store - Filesystem persistence
//!
//! Projects, the regional geometry store, and the shapefile artifacts the
//! pipeline produces all live on disk. This crate owns reading and writing
//! them, including the temp-then-rename replacement every artifact uses.

pub mod boundary_files;
pub mod fs_util;
pub mod geometry_store;
pub mod prj;
pub mod projects;
pub mod shapefile_io;
pub mod upload;

pub use geometry_store::{ExtractedDataset, GeometryStore};
pub use projects::ProjectStore;
pub use shapefile_io::{Layer, LayerFeature};
pub use upload::{UploadSet, UploadedFile};
