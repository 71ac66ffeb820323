//! The in-memory project entity.
//!
//! A [`Project`] is derived from a [`ProjectPath`] and never mutated. The
//! registry rebuilds every project from the store on each cache refresh, so
//! two builds of the same path are distinct values.

use std::sync::Arc;

use serde::Serialize;

use crate::adapter::{self, Adapters, FileTree, GitInfo, StackInfo};
use crate::types::ProjectPath;

#[derive(Debug)]
pub struct Project {
    name: String,
    path: ProjectPath,
    adapters: Adapters,
}

impl Project {
    /// Build a project for `path` and attach the adapter set.
    ///
    /// The path is taken verbatim and not checked for existence; adapters
    /// report filesystem errors when they are used.
    pub fn build(path: ProjectPath) -> Arc<Self> {
        Arc::new_cyclic(|owner| Self {
            name: path.basename(),
            adapters: Adapters::attach(owner),
            path,
        })
    }

    /// Final segment of the path.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &ProjectPath {
        &self.path
    }

    pub fn adapters(&self) -> &Adapters {
        &self.adapters
    }

    pub fn stack_info(&self) -> &StackInfo {
        &self.adapters.stack_info
    }

    pub fn git_info(&self) -> &GitInfo {
        &self.adapters.git_info
    }

    pub fn file_tree(&self) -> &FileTree {
        &self.adapters.file_tree
    }

    /// Serializable view: name, path and the property names of the attached
    /// adapters.
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            name: self.name.clone(),
            path: self.path.clone(),
            adapters: adapter::property_names()
                .into_iter()
                .map(|(_, name)| name)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub name: String,
    pub path: ProjectPath,
    pub adapters: Vec<String>,
}
