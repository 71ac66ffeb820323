//! `file-tree`: top-level listing of the project folder.

use std::fs;
use std::sync::Weak;

use serde::Serialize;

use super::{owner, Adapter};
use crate::error::{io_err, RegistryError};
use crate::project::Project;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub is_dir: bool,
}

#[derive(Debug)]
pub struct FileTree {
    owner: Weak<Project>,
}

impl Adapter for FileTree {
    const ID: &'static str = "file-tree";

    fn new(owner: Weak<Project>) -> Self {
        Self { owner }
    }
}

impl FileTree {
    /// Entries directly under the project root, sorted by name. `.git` is skipped.
    pub fn entries(&self) -> Result<Vec<FileEntry>, RegistryError> {
        let project = owner(&self.owner)?;
        let root = project.path().as_path();

        let mut entries: Vec<FileEntry> = fs::read_dir(root)
            .map_err(|e| io_err(root, e))?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != ".git")
            .map(|e| FileEntry {
                name: e.file_name().to_string_lossy().into_owned(),
                is_dir: e.file_type().map(|t| t.is_dir()).unwrap_or(false),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_sorted_entries_without_git() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("README.md"), "# hi").unwrap();

        let project = Project::build(dir.path().to_string_lossy().into_owned().into());
        let entries = project.file_tree().entries().unwrap();
        assert_eq!(
            entries,
            vec![
                FileEntry { name: "README.md".into(), is_dir: false },
                FileEntry { name: "src".into(), is_dir: true },
            ]
        );
    }

    #[test]
    fn missing_folder_is_an_io_error() {
        let project = Project::build("/no/such/folio/dir".into());
        assert!(matches!(
            project.file_tree().entries(),
            Err(RegistryError::Io { .. })
        ));
    }
}
