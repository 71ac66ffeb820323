pub mod list;
pub mod project;
pub mod show;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use folio_core::{JsonFileStore, ProjectRegistry, StoreOptions};

/// Open the store, build the registry and wait for it to become ready.
pub async fn open_registry(data_dir: Option<&Path>) -> Result<ProjectRegistry> {
    let mut options = StoreOptions::default();
    if let Some(dir) = data_dir {
        let dir = std::path::absolute(dir)
            .with_context(|| format!("cannot resolve data directory '{}'", dir.display()))?;
        options = options.with_cwd(dir);
    }

    let store = JsonFileStore::open(&options).context("failed to open project store")?;
    tracing::debug!(store = %store.path().display(), "using project store");

    let registry = ProjectRegistry::with_system_trash(Arc::new(store))
        .context("failed to initialise project registry")?;
    registry
        .ready()
        .await
        .context("failed to load registered projects")?;
    Ok(registry)
}

/// Make a command-line path absolute against the working directory.
///
/// The registry compares paths verbatim, so every subcommand resolves its
/// argument the same way before handing it over.
pub fn resolve_path(path: &Path) -> Result<String> {
    let absolute = std::path::absolute(path)
        .with_context(|| format!("cannot resolve path '{}'", path.display()))?;
    absolute
        .to_str()
        .map(str::to_owned)
        .with_context(|| format!("path '{}' is not valid UTF-8", absolute.display()))
}
