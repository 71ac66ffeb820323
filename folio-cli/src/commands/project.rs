//! `folio add`, `folio remove` and `folio use`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use folio_core::{DeleteProject, ProjectRegistry, RegistryError};

use super::resolve_path;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Project folder. Relative paths are resolved against the working directory.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Registered project folder.
    pub path: PathBuf,

    /// Also move the folder to the trash.
    #[arg(long)]
    pub remove_files: bool,
}

#[derive(Args, Debug)]
pub struct UseArgs {
    /// Registered project folder.
    pub path: PathBuf,
}

impl AddArgs {
    pub async fn run(self, registry: &ProjectRegistry) -> Result<()> {
        let path = resolve_path(&self.path)?;
        if !self.path.exists() {
            eprintln!(
                "{} '{}' does not exist yet; registering anyway",
                "warning:".yellow(),
                path
            );
        }

        let projects = registry
            .add_project(path.clone())
            .await
            .with_context(|| format!("failed to add '{path}'"))?;

        let project = registry.project(&path)?;
        println!("✓ Added '{}' ({})", project.name(), project.path());
        println!("  {} projects registered; '{}' is current", projects.len(), project.name());
        Ok(())
    }
}

impl RemoveArgs {
    pub async fn run(self, registry: &ProjectRegistry) -> Result<()> {
        let path = resolve_path(&self.path)?;
        let params = DeleteProject {
            path: path.clone().into(),
            remove_files: self.remove_files,
        };

        match registry.delete_project(params).await {
            Ok(_) => {}
            Err(err @ RegistryError::FileRemoval { .. }) => {
                println!("✓ Removed '{path}' from the registry");
                return Err(err).context("the folder was not moved to the trash");
            }
            Err(err) => return Err(err).with_context(|| format!("failed to remove '{path}'")),
        }

        println!("✓ Removed '{path}'");
        if self.remove_files {
            println!("  Folder moved to the trash.");
        }
        match registry.current() {
            Ok(current) => println!("  Current project: {}", current.name()),
            Err(_) => println!("  No current project."),
        }
        Ok(())
    }
}

impl UseArgs {
    pub async fn run(self, registry: &ProjectRegistry) -> Result<()> {
        let path = resolve_path(&self.path)?;
        let project = registry.set_current(path.clone()).await.with_context(|| {
            format!("'{path}' is not registered; run `folio add {path}` first")
        })?;
        println!("✓ Now using '{}' ({})", project.name(), project.path());
        Ok(())
    }
}
