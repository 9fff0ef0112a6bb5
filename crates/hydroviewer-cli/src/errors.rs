use console::style;
use hydroviewer_core::error::HydroviewerError;
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Boundary lies outside every region of the geometry store
pub fn no_region_found() -> CliError {
    CliError::new("No region found")
        .with_context(
            "The project boundary does not intersect any region boundary in the geometry store.",
        )
        .with_suggestion(
            "Check that the boundary is where you expect: hydroviewer project status <project>",
        )
        .with_suggestion("List the available regions: hydroviewer regions")
        .with_suggestion(
            "Or name a region explicitly: hydroviewer clip <project> --region <region>",
        )
        .with_help("Run: hydroviewer clip --help")
}

/// Step run before the step it depends on
pub fn prerequisite_missing(prerequisite: &str, remediation: &str) -> CliError {
    CliError::new(format!("Missing {}", prerequisite))
        .with_context("This step reads files written by an earlier step.")
        .with_suggestion(remediation)
        .with_suggestion("See which steps have run: hydroviewer project status <project>")
}

pub fn project_not_found(name: &str) -> CliError {
    CliError::new(format!("Project not found: {}", name))
        .with_suggestion("List projects: hydroviewer project list")
        .with_suggestion(format!("Create it: hydroviewer project new {}", name))
        .with_suggestion("Or point at another workspace with --workspace")
}

pub fn region_dataset_missing(name: &str, path: &str) -> CliError {
    CliError::new(format!("Region dataset not found: {}", name))
        .with_context(format!("Expected a zipped shapefile at {}", path))
        .with_suggestion("Check the geometry store: hydroviewer doctor")
        .with_suggestion("Or set the store location with --shapefile-dir")
}

pub fn collaborator_failed(service: &str, reason: &str) -> CliError {
    CliError::new(format!("{} request failed", service))
        .with_context(format!("Error: {}", reason))
        .with_suggestion("Check the service URL and that it is reachable")
        .with_suggestion("Check the credentials in hydroviewer.toml")
        .with_help("Run: hydroviewer doctor")
}

pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check hydroviewer.toml in the workspace for syntax errors")
        .with_suggestion("Check HYDROVIEWER_* environment variables")
        .with_help("Run: hydroviewer doctor --verbose")
}

/// Convert an error from a command into a CliError with suggestions
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    if let Some(err) = error.downcast_ref::<HydroviewerError>() {
        return from_domain(err);
    }
    if let Some(err) = error.downcast_ref::<CliError>() {
        return CliError {
            message: err.message.clone(),
            context: err.context.clone(),
            suggestions: err.suggestions.clone(),
            help_command: err.help_command.clone(),
        };
    }

    let message = format!("{:#}", error);
    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the file path and try again")
    } else {
        CliError::new(message)
    }
}

fn from_domain(err: &HydroviewerError) -> CliError {
    match err {
        HydroviewerError::NoRegionFound => no_region_found(),
        HydroviewerError::PrerequisiteMissing { prerequisite, remediation } => {
            prerequisite_missing(prerequisite, remediation)
        }
        HydroviewerError::ProjectNotFound { name } => project_not_found(name),
        HydroviewerError::RegionNotFound { name, path } => {
            region_dataset_missing(name, &path.display().to_string())
        }
        HydroviewerError::Collaborator { service, reason } => collaborator_failed(service, reason),
        HydroviewerError::ConfigInvalid { key, reason } => invalid_config(key, reason),
        other => CliError::new(other.to_string()),
    }
}
