//! Project registry.
//!
//! The store is the authority for which projects exist and which one is
//! active. The registry keeps a derived cache of [`Project`]s that is rebuilt
//! from the store after every mutation and never patched in place.
//!
//! # Serialization
//!
//! `ready`, `set_current`, `add_project` and `delete_project` hold one async
//! mutex for their whole duration, trash included. Each of them is therefore
//! applied as a single step even though it touches two store keys. Reads
//! (`projects`, `project`, `current`) only take the cache's read lock.
//!
//! # Delete ordering
//!
//! list write → optional trash → active selection → cache rebuild. A trash
//! failure is returned after the remaining steps have been applied, so the
//! project is unregistered regardless of what happened on disk. If one of
//! those later steps also fails, the trash error is still the one returned.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::{broadcast, Mutex};

use crate::adapter;
use crate::error::RegistryError;
use crate::events::{EventBus, RegistryEvent};
use crate::project::Project;
use crate::store::{self, KeyValueStore};
use crate::trash::{SystemTrash, Trash};
use crate::types::{DeleteProject, ProjectPath};

pub struct ProjectRegistry {
    store: Arc<dyn KeyValueStore>,
    trash: Arc<dyn Trash>,
    cache: RwLock<Option<Vec<Arc<Project>>>>,
    op_lock: Mutex<()>,
    events: EventBus,
}

impl ProjectRegistry {
    /// Create a registry over `store`, using `trash` for `remove_files`
    /// deletes.
    ///
    /// Fails with [`RegistryError::Configuration`] if the adapter set is
    /// inconsistent. The registry is unusable until [`ready`](Self::ready)
    /// completes.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        trash: Arc<dyn Trash>,
    ) -> Result<Self, RegistryError> {
        adapter::validate_adapter_set()?;
        Ok(Self {
            store,
            trash,
            cache: RwLock::new(None),
            op_lock: Mutex::new(()),
            events: EventBus::new(),
        })
    }

    /// `new` with the operating system's trash.
    pub fn with_system_trash(store: Arc<dyn KeyValueStore>) -> Result<Self, RegistryError> {
        Self::new(store, Arc::new(SystemTrash))
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Build the cache from the stored project list.
    ///
    /// Projects are constructed concurrently; the cache keeps the stored
    /// order. Calling `ready` again rebuilds the cache.
    pub async fn ready(&self) -> Result<(), RegistryError> {
        let _op = self.op_lock.lock().await;
        let projects = self.refresh().await?;
        self.events.mark_ready();
        tracing::info!(count = projects.len(), "project registry ready");
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.events.is_ready()
    }

    /// Resolves once `ready` has completed, immediately if it already has.
    pub async fn wait_ready(&self) {
        self.events.wait_ready().await;
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The cached project list, in stored order. No store access.
    pub fn projects(&self) -> Result<Vec<Arc<Project>>, RegistryError> {
        self.read_cache(|projects| projects.to_vec())
    }

    /// The cached project whose path equals `path` exactly.
    pub fn project(&self, path: impl AsRef<str>) -> Result<Arc<Project>, RegistryError> {
        let path = path.as_ref();
        self.read_cache(|projects| {
            projects
                .iter()
                .find(|p| p.path().as_str() == path)
                .cloned()
        })?
        .ok_or_else(|| RegistryError::NotFound {
            path: path.to_string(),
        })
    }

    /// The project named by the stored active selection.
    ///
    /// `NotFound` if there is no selection or it is not in the cache.
    pub fn current(&self) -> Result<Arc<Project>, RegistryError> {
        self.ensure_ready()?;
        match store::active_path(self.store.as_ref())? {
            Some(path) => self.project(&path),
            None => Err(RegistryError::NotFound {
                path: String::new(),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Persist `path` as the active selection, then resolve it.
    ///
    /// The write is not checked against the registered list; an unregistered
    /// path is stored and then reported as `NotFound`.
    pub async fn set_current(
        &self,
        path: impl Into<ProjectPath>,
    ) -> Result<Arc<Project>, RegistryError> {
        let path = path.into();
        self.ensure_ready()?;
        let _op = self.op_lock.lock().await;

        store::set_active_path(self.store.as_ref(), Some(&path))?;
        tracing::info!(path = %path, "active project set");
        self.events
            .emit(RegistryEvent::CurrentChanged(Some(path.clone())));

        self.project(&path)
    }

    /// Register `path` (if new) and make it the active project.
    ///
    /// Re-adding a registered path leaves the list unchanged but still
    /// updates the selection and rebuilds the cache.
    pub async fn add_project(
        &self,
        path: impl Into<ProjectPath>,
    ) -> Result<Vec<Arc<Project>>, RegistryError> {
        let path = path.into();
        self.ensure_ready()?;
        let _op = self.op_lock.lock().await;

        let mut paths = store::project_paths(self.store.as_ref())?;
        let added = !paths.contains(&path);
        if added {
            paths.push(path.clone());
            store::set_project_paths(self.store.as_ref(), &paths)?;
        }
        store::set_active_path(self.store.as_ref(), Some(&path))?;

        let projects = self.refresh().await?;
        tracing::info!(path = %path, added, count = projects.len(), "project added");

        if added {
            self.events.emit(RegistryEvent::ProjectAdded(path.clone()));
        }
        self.events.emit(RegistryEvent::CurrentChanged(Some(path)));
        Ok(projects)
    }

    /// Unregister a project, optionally moving its folder to the trash.
    ///
    /// If the deleted project was active, the first remaining project becomes
    /// active (or none, if the list is now empty). A trash failure is
    /// returned as [`RegistryError::FileRemoval`] after the list, selection
    /// and cache have been updated.
    pub async fn delete_project(
        &self,
        params: DeleteProject,
    ) -> Result<Vec<Arc<Project>>, RegistryError> {
        let DeleteProject { path, remove_files } = params;
        self.ensure_ready()?;
        let _op = self.op_lock.lock().await;

        let mut paths = store::project_paths(self.store.as_ref())?;
        let before = paths.len();
        paths.retain(|p| p != &path);
        let removed = paths.len() != before;
        store::set_project_paths(self.store.as_ref(), &paths)?;

        let removal = if remove_files {
            self.trash.trash(path.as_path()).await
        } else {
            Ok(())
        };
        if let Err(err) = &removal {
            tracing::warn!(path = %path, error = %err, "moving project to trash failed");
        }

        let finished = self.finish_delete(&path, &paths, removed, remove_files).await;
        match (removal, finished) {
            (Ok(()), finished) => finished,
            (Err(err), Ok(_)) => Err(err),
            // The trash failure happened first; report it and log the rest.
            (Err(err), Err(later)) => {
                tracing::error!(path = %path, error = %later, "updating registry after failed trash");
                Err(err)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// The part of `delete_project` after the list write and trash:
    /// reassign the selection if needed, rebuild, notify.
    async fn finish_delete(
        &self,
        path: &ProjectPath,
        remaining: &[ProjectPath],
        removed: bool,
        remove_files: bool,
    ) -> Result<Vec<Arc<Project>>, RegistryError> {
        let active = store::active_path(self.store.as_ref())?;
        let reassigned = if active.as_ref() == Some(path) {
            let next = remaining.first().cloned();
            store::set_active_path(self.store.as_ref(), next.as_ref())?;
            Some(next)
        } else {
            None
        };

        let projects = self.refresh().await?;
        tracing::info!(path = %path, removed, remove_files, count = projects.len(), "project deleted");

        if removed {
            self.events.emit(RegistryEvent::ProjectDeleted(path.clone()));
        }
        if let Some(next) = reassigned {
            self.events.emit(RegistryEvent::CurrentChanged(next));
        }
        Ok(projects)
    }

    /// Rebuild every project from the stored list and publish the result.
    async fn refresh(&self) -> Result<Vec<Arc<Project>>, RegistryError> {
        let paths = store::project_paths(self.store.as_ref())?;

        let handles: Vec<_> = paths
            .into_iter()
            .map(|path| tokio::task::spawn_blocking(move || Project::build(path)))
            .collect();

        // Awaiting in spawn order keeps the stored order.
        let mut projects = Vec::with_capacity(handles.len());
        for handle in handles {
            let project = handle
                .await
                .map_err(|e| RegistryError::Join(e.to_string()))?;
            projects.push(project);
        }

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *cache = Some(projects.clone());
        tracing::debug!(count = projects.len(), "project cache rebuilt");
        Ok(projects)
    }

    fn read_cache<T>(&self, f: impl FnOnce(&[Arc<Project>]) -> T) -> Result<T, RegistryError> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache.as_deref().map(f).ok_or(RegistryError::NotReady)
    }

    fn ensure_ready(&self) -> Result<(), RegistryError> {
        self.read_cache(|_| ())
    }
}

impl std::fmt::Debug for ProjectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self.read_cache(|p| p.len()).ok();
        f.debug_struct("ProjectRegistry")
            .field("ready", &self.is_ready())
            .field("cached", &cached)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn registry() -> ProjectRegistry {
        ProjectRegistry::with_system_trash(Arc::new(MemoryStore::new())).expect("registry")
    }

    #[tokio::test]
    async fn reads_before_ready_fail() {
        let reg = registry();
        assert!(matches!(reg.projects(), Err(RegistryError::NotReady)));
        assert!(matches!(reg.project("/a"), Err(RegistryError::NotReady)));
        assert!(matches!(reg.current(), Err(RegistryError::NotReady)));
    }

    #[tokio::test]
    async fn writes_before_ready_fail_without_touching_the_store() {
        let reg = registry();
        assert!(matches!(reg.add_project("/a").await, Err(RegistryError::NotReady)));
        assert!(matches!(reg.set_current("/a").await, Err(RegistryError::NotReady)));
        assert!(store::project_paths(reg.store()).unwrap().is_empty());
        assert_eq!(store::active_path(reg.store()).unwrap(), None);
    }

    #[tokio::test]
    async fn empty_store_becomes_ready_with_no_projects() {
        let reg = registry();
        reg.ready().await.unwrap();
        assert!(reg.is_ready());
        assert!(reg.projects().unwrap().is_empty());
        assert!(matches!(reg.current(), Err(RegistryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn rebuild_replaces_project_instances() {
        let reg = registry();
        reg.ready().await.unwrap();
        reg.add_project("/a").await.unwrap();
        let first = reg.project("/a").unwrap();

        reg.add_project("/b").await.unwrap();
        let second = reg.project("/a").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
