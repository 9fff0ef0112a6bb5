//! Standalone HTML viewer.

use hydroviewer_core::config::AppContext;
use hydroviewer_core::error::{HydroviewerError, Result};
use hydroviewer_core::models::ProjectDir;
use hydroviewer_store::projects::read_geoserver_config;
use hydroviewer_store::{boundary_files, fs_util};
use std::fs;
use std::path::PathBuf;

/// Template used when the workspace does not provide one
pub const BUILTIN_TEMPLATE: &str = include_str!("../../templates/hydroviewer_interactive.html");

/// Render `hydroviewer.html` from the project's map-server configuration
/// and geographic boundary
pub fn render_viewer(project: &ProjectDir, ctx: &AppContext) -> Result<PathBuf> {
    let config = read_geoserver_config(project)?.ok_or_else(|| {
        HydroviewerError::prerequisite(
            format!("map server configuration for project '{}'", project.name),
            "Publish the selections to GeoServer first",
        )
    })?;
    let boundaries = boundary_files::read_geographic_text(project)?;

    let template_path = ctx.html_template();
    let template = if template_path.exists() {
        fs::read_to_string(&template_path)?
    } else {
        tracing::debug!(
            path = %template_path.display(),
            "No workspace template, using built-in viewer"
        );
        BUILTIN_TEMPLATE.to_string()
    };

    let title = escape_html(&project.name.title());
    let html = render(
        &template,
        &[
            ("title", title.as_str()),
            ("api_endpoint", ctx.api_endpoint.as_str()),
            ("geoserver_wms_url", config.url.as_str()),
            ("workspace", config.workspace.as_str()),
            ("catchment_layer", config.ctch_layer.as_str()),
            ("drainage_layer", config.dl_layer.as_str()),
            ("boundaries_json", boundaries.as_str()),
        ],
    );

    let path = project.html();
    fs_util::write_file_atomic(&path, html.as_bytes())?;
    tracing::info!(project = %project.name, path = %path.display(), "Rendered hydroviewer");
    Ok(path)
}

/// Replace `{{ key }}` placeholders, with or without inner spaces
///
/// Substituted values are copied verbatim and never scanned again, so a
/// value that itself contains `{{ ... }}` is left as is. Unknown keys keep
/// their placeholder.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };
        let key = after[..close].trim();
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydroviewer_core::config::LayeredConfig;
    use hydroviewer_core::models::{GeoserverConfig, ProjectName};
    use hydroviewer_store::projects::write_geoserver_config;
    use tempfile::TempDir;

    fn context(root: &TempDir) -> AppContext {
        let mut config = LayeredConfig::with_defaults();
        config.workspace.value = root.path().to_path_buf();
        config.to_context().unwrap()
    }

    #[test]
    fn test_render_placeholders() {
        let out = render("<h1>{{ title }}</h1><p>{{title}}</p>{{ other }}", &[("title", "Nile")]);
        assert_eq!(out, "<h1>Nile</h1><p>Nile</p>{{ other }}");
    }

    #[test]
    fn test_render_does_not_expand_substituted_values() {
        let out = render(
            "<p>{{ workspace }}</p><script>{{ boundaries_json }}</script>",
            &[("workspace", "{{ boundaries_json }}"), ("boundaries_json", "[]")],
        );
        assert_eq!(out, "<p>{{ boundaries_json }}</p><script>[]</script>");
    }

    #[test]
    fn test_render_unterminated_placeholder() {
        let out = render("a {{ title }} b {{ title", &[("title", "Nile")]);
        assert_eq!(out, "a Nile b {{ title");
    }

    #[test]
    fn test_viewer_requires_map_server_config() {
        let root = TempDir::new().unwrap();
        let ctx = context(&root);
        let project = ProjectDir::new(
            ProjectName::parse("demo").unwrap(),
            root.path().join("demo"),
        );
        fs::create_dir_all(project.path()).unwrap();
        fs::write(project.boundaries_json(), "{}").unwrap();

        assert!(matches!(
            render_viewer(&project, &ctx),
            Err(HydroviewerError::PrerequisiteMissing { .. })
        ));
        assert!(!project.html().exists());
    }

    #[test]
    fn test_viewer_with_builtin_template() {
        let root = TempDir::new().unwrap();
        let ctx = context(&root);
        let project = ProjectDir::new(
            ProjectName::parse("Upper Nile").unwrap(),
            root.path().join("Upper_Nile"),
        );
        fs::create_dir_all(project.path()).unwrap();
        fs::write(
            project.boundaries_json(),
            r#"{"type":"FeatureCollection","features":[]}"#,
        )
        .unwrap();
        write_geoserver_config(
            &project,
            &GeoserverConfig {
                url: "https://maps.example.org/geoserver/wms".to_string(),
                workspace: "hv".to_string(),
                dl_layer: "drainagelines".to_string(),
                ctch_layer: "catchments".to_string(),
            },
        )
        .unwrap();

        let path = render_viewer(&project, &ctx).unwrap();
        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("<title>Upper Nile Hydroviewer</title>"));
        assert!(html.contains("https://maps.example.org/geoserver/wms"));
        assert!(html.contains(r#"const boundaries = {"type":"FeatureCollection","features":[]};"#));
        assert!(html.contains("hv"));
        assert!(!html.contains("{{"));
    }
}
