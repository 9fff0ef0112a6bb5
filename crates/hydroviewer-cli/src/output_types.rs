use console::style;
use hydroviewer_core::models::{ProjectName, ProjectState, RegionName};
use serde::Serialize;
use tabled::Tabled;

/// Output for project new
#[derive(Debug, Serialize)]
pub struct ProjectOutput {
    pub name: String,
    pub title: String,
    pub path: String,
}

/// One row of project list
#[derive(Debug, Serialize, Tabled)]
pub struct ProjectRow {
    #[tabled(rename = "Project")]
    pub name: String,
    #[tabled(rename = "Boundary")]
    pub boundary: String,
    #[tabled(rename = "Selections")]
    pub selections: String,
    #[tabled(rename = "Published")]
    pub published: String,
}

impl From<&ProjectState> for ProjectRow {
    fn from(state: &ProjectState) -> Self {
        Self {
            name: state.name.to_string(),
            boundary: check(state.boundaries && state.projected_boundary),
            selections: check(state.shapefiles),
            published: check(state.geoserver.is_some()),
        }
    }
}

/// One row of regions
#[derive(Debug, Serialize, Tabled)]
pub struct RegionRow {
    #[tabled(rename = "Region")]
    pub name: String,
    #[tabled(rename = "Boundary dataset")]
    pub dataset: String,
}

impl From<RegionName> for RegionRow {
    fn from(region: RegionName) -> Self {
        Self {
            name: region.display_name(),
            dataset: region.to_string(),
        }
    }
}

/// Output for resolve
#[derive(Debug, Serialize)]
pub struct ResolveOutput {
    pub project: ProjectName,
    pub region: RegionName,
    pub display_name: String,
}

/// Output for export zip and export html
#[derive(Debug, Serialize)]
pub struct ExportOutput {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reused: Option<bool>,
}

/// Output for doctor
#[derive(Debug, Default, Serialize)]
pub struct DoctorOutput {
    pub checks: Vec<DoctorCheck>,
    pub passed: usize,
    pub total: usize,
    /// Rendered human-readable lines, in check order
    #[serde(skip)]
    pub lines: Vec<String>,
}

impl DoctorOutput {
    pub fn push(&mut self, check: DoctorCheck) {
        self.total += 1;
        if check.ok {
            self.passed += 1;
            self.lines.push(format!("{} {}: {}", style("✓").green(), check.name, check.detail));
        } else {
            self.lines.push(format!("{} {}: {}", style("✗").red(), check.name, check.detail));
        }
        if let Some(hint) = &check.hint {
            self.lines.push(format!("  → {}", hint));
        }
        self.checks.push(check);
    }

    /// Verbose detail under the last check
    pub fn note(&mut self, line: String) {
        self.lines.push(format!("  {}", style(line).dim()));
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorCheck {
    pub name: String,
    pub ok: bool,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl DoctorCheck {
    pub fn pass(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            ok: true,
            detail: detail.into(),
            hint: None,
        }
    }

    pub fn fail(name: &str, detail: impl Into<String>, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            ok: false,
            detail: detail.into(),
            hint: Some(hint.to_string()),
        }
    }
}

fn check(done: bool) -> String {
    let mark = if done { "✓" } else { "-" };
    mark.to_string()
}
