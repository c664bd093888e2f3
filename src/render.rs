//! Markdown rendering of the product matrix

use std::fmt::Write;

use crate::matrix::error::MatrixError;
use crate::matrix::property::{PropertyName, Value};
use crate::matrix::registry::ProductRegistry;

const COLUMNS: &[&str] = &[
    "Product",
    "Product Key",
    "Package Name",
    "Ctl Command",
    "Config File",
    "Install Path",
    "Omnibus Projects",
    "GitHub Repo",
    "Downloads Page",
];

/// Render every product at its latest version as a Markdown table
pub fn render_markdown(registry: &ProductRegistry) -> Result<String, MatrixError> {
    let mut out = String::new();
    let _ = writeln!(out, "| {} |", COLUMNS.join(" | "));
    let _ = writeln!(
        out,
        "|{}|",
        COLUMNS.iter().map(|_| " --- ").collect::<Vec<_>>().join("|")
    );

    for key in registry.keys() {
        let view = registry.lookup_latest(key)?;
        let cell = |name| -> Result<String, MatrixError> {
            Ok(display(view.get(name)?.as_ref()))
        };
        let omnibus_projects = view
            .known_omnibus_project_names()?
            .into_iter()
            .collect::<Vec<_>>()
            .join(", ");
        let omnibus_projects = if omnibus_projects.is_empty() {
            display(None)
        } else {
            omnibus_projects
        };

        let row = [
            cell(PropertyName::ProductName)?,
            key.to_string(),
            cell(PropertyName::PackageName)?,
            cell(PropertyName::CtlCommand)?,
            cell(PropertyName::ConfigFile)?,
            cell(PropertyName::InstallPath)?,
            omnibus_projects,
            cell(PropertyName::GithubRepo)?,
            cell(PropertyName::DownloadsProductPageUrl)?,
        ];
        let _ = writeln!(out, "| {} |", row.join(" | "));
    }

    Ok(out)
}

/// Human-readable form of an optional value
pub fn display(value: Option<&Value>) -> String {
    match value {
        Some(Value::Text(text)) => text.clone(),
        Some(Value::NotAvailable) => "not available".to_string(),
        None => "-".to_string(),
    }
}
