//! Project-scoped capability adapters.
//!
//! The adapter set is fixed at compile time. Every [`Project`] owns one
//! instance of each adapter in [`Adapters`]; each instance holds a `Weak`
//! back-reference to its owner and reaches the filesystem only when called.
//!
//! Adapters are identified by kebab-case ids (`stack-info`) and exposed to
//! hosts under a camel-case property name (`stackInfo`). The mapping must be
//! collision-free; [`validate_adapter_set`] checks it once at registry
//! construction.

mod files;
mod git;
mod stack;

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use crate::error::RegistryError;
use crate::project::Project;

pub use files::{FileEntry, FileTree};
pub use git::{GitHead, GitInfo};
pub use stack::{DetectedStack, StackInfo};

/// A capability attached to every project at construction.
pub trait Adapter: Send + Sync + Sized {
    /// Stable identifier of the adapter (kebab-case).
    const ID: &'static str;

    /// Build the adapter for `owner`. Must not touch the filesystem.
    fn new(owner: Weak<Project>) -> Self;
}

/// Identifiers of the static adapter set, in attachment order.
pub const ADAPTER_IDS: &[&str] = &[StackInfo::ID, GitInfo::ID, FileTree::ID];

/// The adapters owned by one [`Project`].
#[derive(Debug)]
pub struct Adapters {
    pub stack_info: StackInfo,
    pub git_info: GitInfo,
    pub file_tree: FileTree,
}

impl Adapters {
    pub(crate) fn attach(owner: &Weak<Project>) -> Self {
        Self {
            stack_info: StackInfo::new(owner.clone()),
            git_info: GitInfo::new(owner.clone()),
            file_tree: FileTree::new(owner.clone()),
        }
    }
}

/// `(id, property name)` for every adapter in the static set.
pub fn property_names() -> Vec<(&'static str, String)> {
    ADAPTER_IDS.iter().map(|id| (*id, camel_case(id))).collect()
}

/// Check that the static adapter set maps to distinct, non-empty property names.
pub fn validate_adapter_set() -> Result<(), RegistryError> {
    validate_ids(ADAPTER_IDS)
}

pub(crate) fn validate_ids(ids: &[&str]) -> Result<(), RegistryError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for id in ids {
        let name = camel_case(id);
        if name.is_empty() {
            return Err(RegistryError::Configuration(format!(
                "adapter id '{id}' has an empty property name"
            )));
        }
        if let Some(previous) = seen.insert(name.clone(), id) {
            return Err(RegistryError::Configuration(format!(
                "adapters '{previous}' and '{id}' both map to property '{name}'"
            )));
        }
    }
    Ok(())
}

/// Convert a delimited identifier into a single camel-case token.
///
/// Segments are split on `-`, `_`, `.` and whitespace. The first segment is
/// lowercased; later segments are lowercased and then capitalized.
pub fn camel_case(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let segments = id
        .split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        .filter(|s| !s.is_empty());
    for (i, segment) in segments.enumerate() {
        let lower = segment.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn owner(weak: &Weak<Project>) -> Result<Arc<Project>, RegistryError> {
    weak.upgrade().ok_or(RegistryError::ProjectDropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_joins_segments() {
        assert_eq!(camel_case("stack-info"), "stackInfo");
        assert_eq!(camel_case("file_tree"), "fileTree");
        assert_eq!(camel_case("git"), "git");
        assert_eq!(camel_case("Dependency-LOCK-file"), "dependencyLockFile");
        assert_eq!(camel_case("--leading--dashes"), "leadingDashes");
        assert_eq!(camel_case("-"), "");
    }

    #[test]
    fn static_set_is_valid() {
        validate_adapter_set().expect("built-in adapters must not collide");
        let names: Vec<String> = property_names().into_iter().map(|(_, n)| n).collect();
        assert_eq!(names, ["stackInfo", "gitInfo", "fileTree"]);
    }

    #[test]
    fn colliding_ids_are_a_configuration_error() {
        let err = validate_ids(&["git-info", "git_info"]).unwrap_err();
        assert!(matches!(err, RegistryError::Configuration(_)), "got: {err}");
        assert!(err.to_string().contains("gitInfo"));
    }

    #[test]
    fn empty_property_name_is_rejected() {
        assert!(validate_ids(&["stack-info", "__"]).is_err());
    }

    #[test]
    fn dropped_owner_is_reported() {
        let weak = {
            let project = Project::build("/tmp/gone".into());
            Arc::downgrade(&project)
        };
        let err = owner(&weak).unwrap_err();
        assert!(matches!(err, RegistryError::ProjectDropped));
    }
}
