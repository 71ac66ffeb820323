//! Folio core library: project registry, persistent store, adapters.
//!
//! - [`store`]: key/value store contract, JSON file and in-memory stores
//! - [`paths`]: data directory layout and [`StoreOptions`]
//! - [`project`] / [`adapter`]: the project entity and its capabilities
//! - [`registry`]: [`ProjectRegistry`], the authoritative list + active selection
//! - [`trash`]: move-to-trash collaborator
//! - [`error`]: [`RegistryError`]

pub mod adapter;
pub mod error;
pub mod events;
pub mod paths;
pub mod project;
pub mod registry;
pub mod store;
pub mod trash;
pub mod types;

pub use error::RegistryError;
pub use events::RegistryEvent;
pub use paths::StoreOptions;
pub use project::{Project, ProjectSummary};
pub use registry::ProjectRegistry;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, Schema};
pub use trash::{SystemTrash, Trash};
pub use types::{DeleteProject, ProjectPath};
