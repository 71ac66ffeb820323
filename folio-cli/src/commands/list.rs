//! `folio list` and `folio current`

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use folio_core::{store, ProjectRegistry, ProjectSummary, RegistryError};

/// Arguments for `folio list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `folio current`.
#[derive(Args, Debug)]
pub struct CurrentArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ListJson {
    current: Option<String>,
    projects: Vec<ProjectSummary>,
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "path")]
    path: String,
}

impl ListArgs {
    pub fn run(self, registry: &ProjectRegistry) -> Result<()> {
        let projects = registry.projects().context("failed to list projects")?;
        let current = store::active_path(registry.store())
            .context("failed to read active project")?
            .map(|p| p.0);

        if self.json {
            let payload = ListJson {
                current,
                projects: projects.iter().map(|p| p.summary()).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&payload)?);
            return Ok(());
        }

        if projects.is_empty() {
            println!("No projects registered.");
            println!("Run: folio add <path>");
            return Ok(());
        }

        let rows: Vec<ProjectRow> = projects
            .iter()
            .map(|p| ProjectRow {
                marker: if current.as_deref() == Some(p.path().as_str()) { "*" } else { "" },
                name: p.name().to_string(),
                path: p.path().to_string(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

impl CurrentArgs {
    pub fn run(self, registry: &ProjectRegistry) -> Result<()> {
        let project = match registry.current() {
            Ok(project) => project,
            Err(RegistryError::NotFound { .. }) => {
                if self.json {
                    println!("null");
                } else {
                    println!("{}", "No current project.".yellow());
                    println!("Run: folio add <path>  or  folio use <path>");
                }
                return Ok(());
            }
            Err(err) => return Err(err).context("failed to resolve current project"),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&project.summary())?);
        } else {
            println!("{} ({})", project.name().bold(), project.path());
        }
        Ok(())
    }
}
