//! `git-info`: repository state read straight from `.git`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Weak;

use serde::Serialize;

use super::{owner, Adapter};
use crate::error::{io_err, RegistryError};
use crate::project::Project;

/// What `HEAD` points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum GitHead {
    Branch(String),
    Detached(String),
}

#[derive(Debug)]
pub struct GitInfo {
    owner: Weak<Project>,
}

impl Adapter for GitInfo {
    const ID: &'static str = "git-info";

    fn new(owner: Weak<Project>) -> Self {
        Self { owner }
    }
}

impl GitInfo {
    /// Whether the project root contains a `.git` directory or gitdir file.
    pub fn is_repository(&self) -> Result<bool, RegistryError> {
        let project = owner(&self.owner)?;
        let root = project.path().as_path();
        fs::metadata(root).map_err(|e| io_err(root, e))?;
        Ok(root.join(".git").exists())
    }

    /// Current `HEAD`, or `None` outside a repository.
    pub fn head(&self) -> Result<Option<GitHead>, RegistryError> {
        let project = owner(&self.owner)?;
        let root = project.path().as_path();
        fs::metadata(root).map_err(|e| io_err(root, e))?;

        let Some(git_dir) = resolve_git_dir(root)? else {
            return Ok(None);
        };
        let head_path = git_dir.join("HEAD");
        let head = fs::read_to_string(&head_path).map_err(|e| io_err(&head_path, e))?;
        Ok(Some(parse_head(&head)))
    }
}

/// `.git` is either the git directory or, for worktrees and submodules, a file
/// containing `gitdir: <path>`.
fn resolve_git_dir(root: &Path) -> Result<Option<PathBuf>, RegistryError> {
    let dot_git = root.join(".git");
    if dot_git.is_dir() {
        return Ok(Some(dot_git));
    }
    if !dot_git.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(&dot_git).map_err(|e| io_err(&dot_git, e))?;
    let Some(target) = content.trim().strip_prefix("gitdir:") else {
        return Ok(None);
    };
    let target = PathBuf::from(target.trim());
    Ok(Some(if target.is_absolute() {
        target
    } else {
        root.join(target)
    }))
}

fn parse_head(content: &str) -> GitHead {
    let content = content.trim();
    match content.strip_prefix("ref:") {
        Some(reference) => {
            let reference = reference.trim();
            let branch = reference.strip_prefix("refs/heads/").unwrap_or(reference);
            GitHead::Branch(branch.to_string())
        }
        None => GitHead::Detached(content.to_string()),
    }
}
