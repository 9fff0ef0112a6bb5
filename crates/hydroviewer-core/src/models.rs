pub mod geometry;
pub mod project;
pub mod publish;
pub mod region;

pub use geometry::Crs;
pub use project::{
    GeoserverConfig, ProjectDir, ProjectName, ProjectState, ARCHIVE_FILE, BOUNDARIES_FILE,
    GEOSERVER_CONFIG_FILE, HTML_FILE, PROJECTED_DIR,
};
pub use publish::{MapServerTarget, PartOutcome, PublishReport};
pub use region::{ClipTarget, DatasetRole, RegionName, COMID_FIELD};
