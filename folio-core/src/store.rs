//! Persistent key/value store.
//!
//! The store is the single source of truth for project membership and the
//! active selection. Two keys are used:
//!
//! | key        | type            | default |
//! |------------|-----------------|---------|
//! | `project`  | string (path)   | `{}`    |
//! | `projects` | array of string | `[]`    |
//!
//! [`JsonFileStore`] keeps a JSON document on disk and re-reads it on every
//! `get`. Writes use the atomic `.tmp` + `rename` flow.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::{json, Map, Value};

use crate::error::{store_err, RegistryError};
use crate::paths::StoreOptions;
use crate::types::ProjectPath;

/// Key holding the active project's path.
pub const PROJECT_KEY: &str = "project";
/// Key holding the ordered list of registered project paths.
pub const PROJECTS_KEY: &str = "projects";

// ---------------------------------------------------------------------------
// 1. Schema
// ---------------------------------------------------------------------------

/// Per-key defaults returned by `get` when a key is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    defaults: BTreeMap<String, Value>,
}

impl Schema {
    pub fn empty() -> Self {
        Self {
            defaults: BTreeMap::new(),
        }
    }

    /// The registry schema: `project` → `{}`, `projects` → `[]`.
    pub fn registry() -> Self {
        Self::empty()
            .with_default(PROJECT_KEY, json!({}))
            .with_default(PROJECTS_KEY, json!([]))
    }

    pub fn with_default(mut self, key: impl Into<String>, value: Value) -> Self {
        self.defaults.insert(key.into(), value);
        self
    }

    /// Default for `key`, or `null` if the key is not declared.
    pub fn default_for(&self, key: &str) -> Value {
        self.defaults.get(key).cloned().unwrap_or(Value::Null)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::registry()
    }
}

// ---------------------------------------------------------------------------
// 2. Store contract
// ---------------------------------------------------------------------------

/// Durable key/value storage with JSON values.
///
/// Each call is expected to be atomic on its own; there are no multi-key
/// transactions.
pub trait KeyValueStore: Send + Sync {
    /// Stored value for `key`, or the schema default if absent.
    fn get(&self, key: &str) -> Result<Value, RegistryError>;

    /// Overwrite `key`. Durable before returning.
    fn set(&self, key: &str, value: Value) -> Result<(), RegistryError>;

    /// Remove `key`; subsequent `get`s return the schema default.
    fn delete(&self, key: &str) -> Result<(), RegistryError>;

    /// Move `value` to the front of the array at `key`, dropping any earlier
    /// occurrence, and persist the resulting array. Non-array values are left
    /// untouched.
    fn add(&self, key: &str, value: &str) -> Result<(), RegistryError> {
        if let Value::Array(values) = self.get(key)? {
            let mut values: Vec<Value> = values
                .into_iter()
                .filter(|v| v.as_str() != Some(value))
                .collect();
            values.insert(0, Value::from(value));
            self.set(key, Value::Array(values))?;
        }
        Ok(())
    }

    /// Filter `value` out of the array at `key`. A missing (`null`) value is
    /// treated as an empty array.
    fn remove(&self, key: &str, value: &str) -> Result<(), RegistryError> {
        let values = match self.get(key)? {
            Value::Array(values) => values,
            Value::Null => Vec::new(),
            _ => return Ok(()),
        };
        let values: Vec<Value> = values
            .into_iter()
            .filter(|v| v.as_str() != Some(value))
            .collect();
        self.set(key, Value::Array(values))
    }

    /// Whether the array at `key` contains `value`.
    fn has(&self, key: &str, value: &str) -> Result<bool, RegistryError> {
        Ok(match self.get(key)? {
            Value::Array(values) => values.iter().any(|v| v.as_str() == Some(value)),
            _ => false,
        })
    }
}

// ---------------------------------------------------------------------------
// 3. Typed accessors for the registry keys
// ---------------------------------------------------------------------------

/// Registered project paths in stored order. Non-string entries are skipped.
pub fn project_paths(store: &dyn KeyValueStore) -> Result<Vec<ProjectPath>, RegistryError> {
    Ok(match store.get(PROJECTS_KEY)? {
        Value::Array(values) => values
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(ProjectPath(s)),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

pub fn set_project_paths(
    store: &dyn KeyValueStore,
    paths: &[ProjectPath],
) -> Result<(), RegistryError> {
    let values = paths.iter().map(|p| Value::from(p.as_str())).collect();
    store.set(PROJECTS_KEY, Value::Array(values))
}

/// The active project path. `{}`, `null` and `""` all mean no selection.
pub fn active_path(store: &dyn KeyValueStore) -> Result<Option<ProjectPath>, RegistryError> {
    Ok(match store.get(PROJECT_KEY)? {
        Value::String(s) if !s.is_empty() => Some(ProjectPath(s)),
        _ => None,
    })
}

/// Persist the active selection. `None` is stored as `""`.
pub fn set_active_path(
    store: &dyn KeyValueStore,
    path: Option<&ProjectPath>,
) -> Result<(), RegistryError> {
    let value = path.map(|p| p.as_str()).unwrap_or_default();
    store.set(PROJECT_KEY, Value::from(value))
}

// ---------------------------------------------------------------------------
// 4. JSON file store
// ---------------------------------------------------------------------------

/// Store backed by a single JSON object on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    schema: Schema,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store described by `options`, resolving relative locations
    /// against `home`.
    pub fn open_at(home: &Path, options: &StoreOptions) -> Result<Self, RegistryError> {
        Self::open_file(options.file_at(home), Schema::registry())
    }

    /// `open_at` convenience wrapper; uses `dirs::home_dir()` when needed.
    pub fn open(options: &StoreOptions) -> Result<Self, RegistryError> {
        let path = options.dir()?.join(format!("{}.json", options.name));
        Self::open_file(path, Schema::registry())
    }

    /// Open (or create) the store document at `path`.
    ///
    /// Fails with [`RegistryError::StoreUnavailable`] if the directory cannot
    /// be created or the document cannot be written.
    pub fn open_file(path: PathBuf, schema: Schema) -> Result<Self, RegistryError> {
        let unavailable = |source| RegistryError::StoreUnavailable {
            path: path.clone(),
            source,
        };

        let Some(dir) = path.parent() else {
            return Err(unavailable(std::io::Error::other("store path has no parent")));
        };
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir).map_err(unavailable)?;
            set_dir_permissions(dir).map_err(unavailable)?;
        }

        let store = Self {
            path: path.clone(),
            schema,
            write_lock: Mutex::new(()),
        };

        // Rewrite the document through the same `.tmp` + rename path every
        // later write uses, so a broken write path fails here.
        let doc = if path.exists() {
            store.read_document()?
        } else {
            Map::new()
        };
        store.write_document(&doc).map_err(|err| match err {
            RegistryError::Store { source, .. } => unavailable(source),
            other => other,
        })?;

        tracing::debug!(path = %store.path.display(), "opened store");
        Ok(store)
    }

    /// Location of the store document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, Value>, RegistryError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|e| store_err(&self.path, e))?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&contents).map_err(|source| RegistryError::StoreParse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_document(&self, doc: &Map<String, Value>) -> Result<(), RegistryError> {
        let json = serde_json::to_string_pretty(doc).map_err(|source| RegistryError::StoreParse {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| store_err(&tmp, e))?;
        set_file_permissions(&tmp).map_err(|e| store_err(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| store_err(&self.path, e))?;
        Ok(())
    }

    fn update<F>(&self, key: &str, mutate: F) -> Result<(), RegistryError>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut doc = self.read_document()?;
        mutate(&mut doc);
        self.write_document(&doc)?;
        tracing::debug!(key, path = %self.path.display(), "store write");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Value, RegistryError> {
        let mut doc = self.read_document()?;
        Ok(doc
            .remove(key)
            .unwrap_or_else(|| self.schema.default_for(key)))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), RegistryError> {
        self.update(key, |doc| {
            doc.insert(key.to_string(), value);
        })
    }

    fn delete(&self, key: &str) -> Result<(), RegistryError> {
        self.update(key, |doc| {
            doc.remove(key);
        })
    }
}

// ---------------------------------------------------------------------------
// 5. In-memory store
// ---------------------------------------------------------------------------

/// Non-durable store with the same schema semantics, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    schema: Schema,
    values: Mutex<Map<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            values: Mutex::new(Map::new()),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Value, RegistryError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values
            .get(key)
            .cloned()
            .unwrap_or_else(|| self.schema.default_for(key)))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), RegistryError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), RegistryError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
