//! Error types for folio-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from store, project and registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No project with this path is present in the in-memory cache.
    #[error("project not found: {path}")]
    NotFound { path: String },

    /// A registry read or write was attempted before `ready()` completed.
    #[error("project registry is not ready; call `ready()` first")]
    NotReady,

    /// The store directory could not be created or written at open time.
    #[error("store unavailable at {path}: {source}")]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the store file failed.
    #[error("store I/O error at {path}: {source}")]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but is not a valid JSON object.
    #[error("failed to parse store at {path}: {source}")]
    StoreParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Moving a project folder to the trash failed. Registry bookkeeping has
    /// already been applied when this is returned.
    #[error("failed to move {path} to trash: {source}")]
    FileRemoval {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The static adapter set is inconsistent (e.g. two identifiers map to the
    /// same property name).
    #[error("adapter configuration error: {0}")]
    Configuration(String),

    /// Filesystem access from an adapter failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An adapter outlived the project that owns it.
    #[error("owning project has been dropped")]
    ProjectDropped,

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or pass --data-dir")]
    HomeNotFound,

    /// A blocking project construction task panicked or was cancelled.
    #[error("project construction task failed: {0}")]
    Join(String),
}

impl RegistryError {
    /// `true` for failures of the persistent medium (unwritable, unreadable, corrupt).
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Self::Store { .. } | Self::StoreParse { .. } | Self::StoreUnavailable { .. }
        )
    }
}

pub(crate) fn store_err(path: impl Into<PathBuf>, source: std::io::Error) -> RegistryError {
    RegistryError::Store {
        path: path.into(),
        source,
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RegistryError {
    RegistryError::Io {
        path: path.into(),
        source,
    }
}
