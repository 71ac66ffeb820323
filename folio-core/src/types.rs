//! Domain types shared by the store and the registry.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Filesystem path of a registered project folder.
///
/// Kept as the exact string the host supplied: two paths are the same project
/// only if their strings are equal. No normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectPath(pub String);

impl ProjectPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Final path segment, or an empty string for paths such as `/`.
    pub fn basename(&self) -> String {
        self.as_path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectPath {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for ProjectPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parameters for [`ProjectRegistry::delete_project`](crate::registry::ProjectRegistry::delete_project).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteProject {
    pub path: ProjectPath,
    /// Also move the folder to the trash.
    pub remove_files: bool,
}

impl DeleteProject {
    /// Unregister only; files on disk are left alone.
    pub fn unregister(path: impl Into<ProjectPath>) -> Self {
        Self {
            path: path.into(),
            remove_files: false,
        }
    }

    /// Unregister and move the folder to the trash.
    pub fn with_files(path: impl Into<ProjectPath>) -> Self {
        Self {
            path: path.into(),
            remove_files: true,
        }
    }
}
