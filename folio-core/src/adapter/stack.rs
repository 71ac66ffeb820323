//! `stack-info`: language detection from indicator files in the project root.

use std::fs;
use std::path::Path;
use std::sync::Weak;

use serde::Serialize;

use super::{owner, Adapter};
use crate::error::{io_err, RegistryError};
use crate::project::Project;

/// Indicator files in priority order: specific manifests before generic ones.
const INDICATORS: &[(&str, &str)] = &[
    ("Cargo.toml", "Rust"),
    ("go.mod", "Go"),
    ("pubspec.yaml", "Dart"),
    ("composer.json", "PHP"),
    ("mix.exs", "Elixir"),
    ("Gemfile", "Ruby"),
    ("pom.xml", "Java"),
    ("build.gradle.kts", "Kotlin"),
    ("build.gradle", "Java"),
    ("Package.swift", "Swift"),
    ("package.json", "JavaScript"),
    ("pyproject.toml", "Python"),
    ("requirements.txt", "Python"),
];

/// A detected technology stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedStack {
    pub language: String,
    /// Indicator file that decided the language, relative to the project root.
    pub manifest: String,
}

#[derive(Debug)]
pub struct StackInfo {
    owner: Weak<Project>,
}

impl Adapter for StackInfo {
    const ID: &'static str = "stack-info";

    fn new(owner: Weak<Project>) -> Self {
        Self { owner }
    }
}

impl StackInfo {
    /// Detect the primary language of the project.
    ///
    /// Returns `Ok(None)` when no indicator file is present and an `Io` error
    /// when the project folder itself is unreadable.
    pub fn detect(&self) -> Result<Option<DetectedStack>, RegistryError> {
        let project = owner(&self.owner)?;
        let root = project.path().as_path();
        fs::metadata(root).map_err(|e| io_err(root, e))?;

        let Some((manifest, language)) = INDICATORS
            .iter()
            .find(|(file, _)| root.join(file).is_file())
        else {
            return Ok(None);
        };

        let language = if *manifest == "package.json" && root.join("tsconfig.json").is_file() {
            "TypeScript"
        } else {
            *language
        };

        Ok(Some(DetectedStack {
            language: language.to_string(),
            manifest: manifest.to_string(),
        }))
    }

    /// Package name declared in `Cargo.toml` or `package.json`, if any.
    pub fn package_name(&self) -> Result<Option<String>, RegistryError> {
        let project = owner(&self.owner)?;
        let root = project.path().as_path();
        fs::metadata(root).map_err(|e| io_err(root, e))?;
        Ok(cargo_name(root).or_else(|| package_json_name(root)))
    }
}

fn cargo_name(root: &Path) -> Option<String> {
    let content = fs::read_to_string(root.join("Cargo.toml")).ok()?;
    let table: toml::Table = toml::from_str(&content).ok()?;
    table
        .get("package")?
        .get("name")?
        .as_str()
        .map(String::from)
}

fn package_json_name(root: &Path) -> Option<String> {
    let content = fs::read_to_string(root.join("package.json")).ok()?;
    let value: serde_json::Value = serde_json::from_str(&content).ok()?;
    value.get("name")?.as_str().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project_in(dir: &TempDir) -> std::sync::Arc<Project> {
        Project::build(dir.path().to_string_lossy().into_owned().into())
    }

    #[test]
    fn detects_rust_and_reads_crate_name() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Cargo.toml"),
            "[package]\nname = \"widget\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();

        let project = project_in(&dir);
        let stack = project.stack_info().detect().unwrap().unwrap();
        assert_eq!(stack.language, "Rust");
        assert_eq!(stack.manifest, "Cargo.toml");
        assert_eq!(project.stack_info().package_name().unwrap().as_deref(), Some("widget"));
    }

    #[test]
    fn package_json_with_tsconfig_is_typescript() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name":"web"}"#).unwrap();
        fs::write(dir.path().join("tsconfig.json"), "{}").unwrap();

        let project = project_in(&dir);
        let stack = project.stack_info().detect().unwrap().unwrap();
        assert_eq!(stack.language, "TypeScript");
        assert_eq!(project.stack_info().package_name().unwrap().as_deref(), Some("web"));
    }

    #[test]
    fn empty_folder_has_no_stack() {
        let dir = TempDir::new().unwrap();
        assert_eq!(project_in(&dir).stack_info().detect().unwrap(), None);
    }

    #[test]
    fn missing_folder_surfaces_io_error() {
        let project = Project::build("/definitely/not/here/folio".into());
        let err = project.stack_info().detect().unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }), "got: {err}");
    }
}
