use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Hydroviewer creator - clip GEOGloWS river networks to a project boundary
#[derive(Parser, Debug)]
#[command(name = "hydroviewer")]
#[command(
    about = "Clip regional river networks to a boundary and publish a hydroviewer",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// App workspace holding projects/ and hydroviewer.toml
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Geometry store directory (defaults to <workspace>/shapefiles)
    #[arg(long, global = true, value_name = "DIR")]
    pub shapefile_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, list, inspect, and delete projects
    Project(ProjectArgs),

    /// Set a project's boundary
    Boundary(BoundaryArgs),

    /// Find the region a project's boundary falls in
    Resolve(ProjectRef),

    /// Clip drainage lines and catchments into a project
    Clip(ClipArgs),

    /// Resolve the region, then clip drainage lines and catchments
    Run(RunArgs),

    /// Export a project's selections
    Export(ExportArgs),

    /// List the regions in the geometry store
    Regions(RegionsArgs),

    /// Run health checks and diagnostics
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct ProjectRef {
    /// Project name
    pub project: String,
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Create a new project
    New(ProjectRef),

    /// List projects
    List,

    /// Delete a project and everything in it
    Delete(DeleteArgs),

    /// Show which pipeline steps have run
    Status(ProjectRef),
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Project name
    pub project: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct BoundaryArgs {
    #[command(subcommand)]
    pub command: BoundaryCommand,
}

#[derive(Subcommand, Debug)]
pub enum BoundaryCommand {
    /// Replace the boundary from one source
    Set(BoundarySetArgs),
}

#[derive(Args, Debug)]
#[command(group(
    clap::ArgGroup::new("source")
        .required(true)
        .args(["geojson", "atlas", "shapefile"])
))]
pub struct BoundarySetArgs {
    /// Project name
    pub project: String,

    /// GeoJSON file
    #[arg(long, value_name = "FILE")]
    pub geojson: Option<PathBuf>,

    /// Living Atlas world region, e.g. "Southern Africa"
    #[arg(long, value_name = "NAME")]
    pub atlas: Option<String>,

    /// Shapefile components (.shp, .shx, .dbf, optional .prj and .cpg)
    #[arg(long, value_name = "FILES", num_args = 1..)]
    pub shapefile: Vec<PathBuf>,
}

/// Dataset to clip
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ClipOnly {
    Drainageline,
    Catchment,
}

#[derive(Args, Debug)]
pub struct ClipArgs {
    /// Project name
    pub project: String,

    /// Region to clip from; resolved from the boundary when omitted
    #[arg(long)]
    pub region: Option<String>,

    /// Clip only one dataset
    #[arg(long, value_enum)]
    pub only: Option<ClipOnly>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Project name
    pub project: String,

    /// Region to clip from; resolved from the boundary when omitted
    #[arg(long)]
    pub region: Option<String>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Project name
    pub project: String,

    #[command(subcommand)]
    pub target: ExportTarget,
}

#[derive(Subcommand, Debug)]
pub enum ExportTarget {
    /// Zip both selections into hydroviewer_shapefiles.zip
    Zip,

    /// Render the standalone viewer, hydroviewer.html
    Html,

    /// Publish both selections to GeoServer
    Geoserver(GeoserverArgs),
}

#[derive(Args, Debug)]
pub struct GeoserverArgs {
    /// GeoServer REST endpoint, e.g. http://localhost:8080/geoserver/rest/
    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// GeoServer workspace to publish into
    #[arg(long = "geoserver-workspace", value_name = "NAME")]
    pub geoserver_workspace: Option<String>,
}

#[derive(Args, Debug)]
pub struct RegionsArgs {
    /// List Living Atlas world regions instead
    #[arg(long)]
    pub atlas: bool,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Show detailed diagnostic information
    #[arg(long)]
    pub verbose: bool,
}
