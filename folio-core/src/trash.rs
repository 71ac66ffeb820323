//! Move-to-trash collaborator used by `delete_project`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::RegistryError;

/// Recoverable removal of a project folder.
#[async_trait]
pub trait Trash: Send + Sync {
    /// Move `path` to the trash. Failures are reported as
    /// [`RegistryError::FileRemoval`].
    async fn trash(&self, path: &Path) -> Result<(), RegistryError>;
}

/// The operating system's trash / recycle bin, via the `trash` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTrash;

#[async_trait]
impl Trash for SystemTrash {
    async fn trash(&self, path: &Path) -> Result<(), RegistryError> {
        let owned: PathBuf = path.to_path_buf();
        let result = tokio::task::spawn_blocking(move || trash::delete(&owned))
            .await
            .map_err(|e| RegistryError::Join(e.to_string()))?;
        result.map_err(|source| RegistryError::FileRemoval {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
    }
}
