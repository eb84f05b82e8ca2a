//! Periodic chat-count reconciliation.
//!
//! The poller refetches the whole count list on a fixed interval and
//! overwrites local state last-writer-wins. Optimistic increments made
//! between ticks may diverge from server truth for at most one interval.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

use crate::controllers::WorkspaceEvent;
use crate::models::CountStore;

use super::backend::ChatBackend;
use super::generation::Generation;

/// Shared count-synchronization state: the store, the active project, and
/// the generation that invalidates in-flight fetches on project switches.
pub(crate) struct CountSync {
    pub(crate) backend: Arc<dyn ChatBackend>,
    pub(crate) counts: RwLock<CountStore>,
    pub(crate) project: RwLock<Option<String>>,
    pub(crate) generation: Generation,
    pub(crate) events: broadcast::Sender<WorkspaceEvent>,
}

impl CountSync {
    pub(crate) fn new(
        backend: Arc<dyn ChatBackend>,
        events: broadcast::Sender<WorkspaceEvent>,
    ) -> Self {
        Self {
            backend,
            counts: RwLock::new(CountStore::new()),
            project: RwLock::new(None),
            generation: Generation::new(),
            events,
        }
    }

    /// One reconciliation tick. Skipped without a project; errors are
    /// logged and left for the next unconditional tick; results for a
    /// superseded project generation are dropped.
    pub(crate) async fn poll_once(&self) {
        let Some(project) = self.project.read().clone() else {
            return;
        };
        let generation = self.generation.current();

        match self.backend.fetch_counts(&project).await {
            Ok(counts) => {
                if !self.generation.is_current(generation) {
                    debug!(project = %project, "Stale count poll dropped");
                    return;
                }
                self.counts.write().overwrite(counts);
                let _ = self.events.send(WorkspaceEvent::CountsUpdated);
            }
            Err(e) => {
                warn!(project = %project, error = %e, "Error syncing chat counts");
            }
        }
    }

    /// Initial/manual refresh. Unlike the periodic tick, a failure here
    /// clears the list — there is nothing trustworthy to show yet.
    pub(crate) async fn refresh(&self) {
        let Some(project) = self.project.read().clone() else {
            return;
        };
        let generation = self.generation.current();

        let result = self.backend.fetch_counts(&project).await;
        if !self.generation.is_current(generation) {
            debug!(project = %project, "Stale count refresh dropped");
            return;
        }

        match result {
            Ok(counts) => self.counts.write().overwrite(counts),
            Err(e) => {
                warn!(project = %project, error = %e, "Error fetching chat counts");
                self.counts.write().clear();
            }
        }
        let _ = self.events.send(WorkspaceEvent::CountsUpdated);
    }
}

/// Owns the recurring poll task; aborted on drop (component teardown).
pub(crate) struct CountPoller {
    handle: JoinHandle<()>,
}

impl CountPoller {
    pub(crate) fn spawn(sync: Arc<CountSync>, poll_interval: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; the initial fetch is done by
            // project selection, so consume it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                sync.poll_once().await;
            }
        });
        Self { handle }
    }
}

impl Drop for CountPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
