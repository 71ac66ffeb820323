//! Data directory layout and store options.
//!
//! ```text
//! ~/.folio/
//!   data/
//!     config.json     (store document, mode 0600)
//! ```
//!
//! Pure helpers take an explicit `home`; the no-arg forms derive it from
//! `dirs::home_dir()`. Tests always use the explicit forms.

use std::path::{Path, PathBuf};

use crate::error::RegistryError;

pub const DEFAULT_STORE_NAME: &str = "config";

pub fn folio_root(home: &Path) -> PathBuf {
    home.join(".folio")
}

/// `<home>/.folio/data`
pub fn default_data_dir_at(home: &Path) -> PathBuf {
    folio_root(home).join("data")
}

/// Where and under which name a [`JsonFileStore`](crate::store::JsonFileStore)
/// keeps its document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// File stem of the store document; `.json` is appended.
    pub name: String,
    /// Store directory. Relative values are resolved against the default data
    /// directory; `None` means the default data directory itself.
    pub cwd: Option<PathBuf>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_STORE_NAME.to_string(),
            cwd: None,
        }
    }
}

impl StoreOptions {
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Resolve the store directory against `home`. Pure, no I/O.
    pub fn dir_at(&self, home: &Path) -> PathBuf {
        let default = default_data_dir_at(home);
        match &self.cwd {
            Some(cwd) if cwd.is_absolute() => cwd.clone(),
            Some(cwd) => default.join(cwd),
            None => default,
        }
    }

    /// `<dir>/<name>.json`. Pure, no I/O.
    pub fn file_at(&self, home: &Path) -> PathBuf {
        self.dir_at(home).join(format!("{}.json", self.name))
    }

    /// Like [`dir_at`](Self::dir_at), but only consults the home directory
    /// when `cwd` is not already absolute.
    pub fn dir(&self) -> Result<PathBuf, RegistryError> {
        match &self.cwd {
            Some(cwd) if cwd.is_absolute() => Ok(cwd.clone()),
            _ => Ok(self.dir_at(&home()?)),
        }
    }
}

fn home() -> Result<PathBuf, RegistryError> {
    dirs::home_dir().ok_or(RegistryError::HomeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_live_under_dot_folio() {
        let file = StoreOptions::default().file_at(Path::new("/home/u"));
        assert_eq!(file, PathBuf::from("/home/u/.folio/data/config.json"));
    }

    #[test]
    fn relative_cwd_is_nested_in_data_dir() {
        let opts = StoreOptions::default().with_cwd("workspaces").with_name("state");
        assert_eq!(
            opts.file_at(Path::new("/h")),
            PathBuf::from("/h/.folio/data/workspaces/state.json")
        );
    }

    #[test]
    fn absolute_cwd_is_used_verbatim() {
        let opts = StoreOptions::default().with_cwd("/var/lib/folio");
        assert_eq!(opts.dir_at(Path::new("/h")), PathBuf::from("/var/lib/folio"));
        assert_eq!(opts.dir().unwrap(), PathBuf::from("/var/lib/folio"));
    }
}
