//! Registry lifecycle notifications.

use tokio::sync::{broadcast, watch};

use crate::types::ProjectPath;

const EVENT_CAPACITY: usize = 64;

/// Emitted by [`ProjectRegistry`](crate::registry::ProjectRegistry) after the
/// corresponding store writes have completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// The cache has been built for the first time.
    Ready,
    ProjectAdded(ProjectPath),
    ProjectDeleted(ProjectPath),
    /// The active selection changed; `None` means no project is active.
    CurrentChanged(Option<ProjectPath>),
}

/// Fan-out of registry events plus a sticky readiness flag, so listeners that
/// subscribe late can still wait for readiness.
#[derive(Debug)]
pub(crate) struct EventBus {
    events: broadcast::Sender<RegistryEvent>,
    ready: watch::Sender<bool>,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (ready, _) = watch::channel(false);
        Self { events, ready }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    pub(crate) fn emit(&self, event: RegistryEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }

    /// Flip the readiness flag. Emits [`RegistryEvent::Ready`] only once.
    pub(crate) fn mark_ready(&self) {
        let first = self.ready.send_if_modified(|ready| !std::mem::replace(ready, true));
        if first {
            self.emit(RegistryEvent::Ready);
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    pub(crate) async fn wait_ready(&self) {
        let mut rx = self.ready.subscribe();
        // The sender lives as long as `self`, so this only ends once ready.
        let _ = rx.wait_for(|ready| *ready).await;
    }
}
