//! `folio show [<path>]`: adapter report for one project.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use folio_core::adapter::{DetectedStack, GitHead};
use folio_core::{Project, ProjectRegistry};

use super::resolve_path;

/// Arguments for `folio show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Registered project folder. Defaults to the current project.
    pub path: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ShowJson {
    name: String,
    path: String,
    stack: Option<DetectedStack>,
    package: Option<String>,
    git: Option<GitHead>,
    entries: usize,
}

impl ShowArgs {
    pub fn run(self, registry: &ProjectRegistry) -> Result<()> {
        let project: Arc<Project> = match &self.path {
            Some(path) => {
                let path = resolve_path(path)?;
                registry
                    .project(&path)
                    .with_context(|| format!("'{path}' is not registered"))?
            }
            None => registry
                .current()
                .context("no current project; pass a path or run `folio use <path>`")?,
        };

        let report = build_report(&project)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("{} ({})", report.name.bold(), report.path);
        match &report.stack {
            Some(stack) => println!("  stack:   {} ({})", stack.language, stack.manifest),
            None => println!("  stack:   {}", "unknown".dimmed()),
        }
        if let Some(package) = &report.package {
            println!("  package: {package}");
        }
        match &report.git {
            Some(GitHead::Branch(branch)) => println!("  git:     on {}", branch.green()),
            Some(GitHead::Detached(commit)) => println!("  git:     detached at {commit}"),
            None => println!("  git:     {}", "not a repository".dimmed()),
        }
        println!("  entries: {}", report.entries);
        Ok(())
    }
}

fn build_report(project: &Project) -> Result<ShowJson> {
    let path = project.path().to_string();
    let stack = project
        .stack_info()
        .detect()
        .with_context(|| format!("cannot inspect '{path}'"))?;
    let package = project.stack_info().package_name()?;
    let git = project.git_info().head()?;
    let entries = project.file_tree().entries()?.len();

    Ok(ShowJson {
        name: project.name().to_string(),
        path,
        stack,
        package,
        git,
        entries,
    })
}
