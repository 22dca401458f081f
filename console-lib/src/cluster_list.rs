//! Cluster dashboard state.
//!
//! The list fetches on mount and then every poll interval until it is
//! unmounted. Fetches may overlap (a poll and a refresh after delete), so
//! each one takes a ticket and a response only lands if no newer response
//! has landed before it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use multik8s_common::{Cluster, ClusterId, ConsoleApi, User};
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::prompt::Prompt;

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch clusters";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete cluster";
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this cluster?";

/// Point-in-time copy of the list for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    pub clusters: Vec<Cluster>,
    /// True until the first fetch settles.
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for ListSnapshot {
    fn default() -> Self {
        Self {
            clusters: Vec::new(),
            loading: true,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user is not an admin, or the cluster is unknown or already going
    /// away; nothing was asked or sent.
    NotPermitted,
    Cancelled,
    Deleted,
    /// The request failed; the message was shown as an alert.
    Failed(String),
}

#[derive(Default)]
struct ListState {
    snapshot: ListSnapshot,
    applied: u64,
}

#[derive(Clone)]
struct Fetcher {
    api: Arc<dyn ConsoleApi>,
    state: Arc<RwLock<ListState>>,
    issued: Arc<AtomicU64>,
    // Bumped every time a response lands.
    revision: Arc<watch::Sender<u64>>,
}

impl Fetcher {
    async fn fetch(&self) {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.list_clusters().await;

        let mut state = self.state.write().await;
        if ticket <= state.applied {
            debug!(
                "Discarding stale cluster list (ticket {}, already applied {})",
                ticket, state.applied
            );
            return;
        }
        state.applied = ticket;

        match result {
            Ok(clusters) => {
                debug!("Fetched {} clusters", clusters.len());
                state.snapshot.clusters = clusters;
                state.snapshot.error = None;
            }
            Err(err) => {
                warn!("Failed to fetch clusters: {}", err);
                // The body of a failed list call is never shown.
                let message = if err.is_server() {
                    FETCH_FAILED_MESSAGE.to_string()
                } else {
                    err.user_message(FETCH_FAILED_MESSAGE)
                };
                state.snapshot.error = Some(message);
            }
        }
        state.snapshot.loading = false;
        self.revision.send_modify(|rev| *rev += 1);
    }
}

/// Whether the delete action is offered to `user` for `cluster`.
pub fn can_delete(user: &User, cluster: &Cluster) -> bool {
    user.is_admin() && !cluster.status.is_terminating()
}

/// The dashboard: the signed-in user's view of every cluster.
pub struct ClusterList {
    user: User,
    fetcher: Fetcher,
    poll_interval: Duration,
    poller: Option<JoinHandle<()>>,
}

impl ClusterList {
    pub fn new(api: Arc<dyn ConsoleApi>, user: User, poll_interval: Duration) -> Self {
        Self {
            user,
            fetcher: Fetcher {
                api,
                state: Arc::new(RwLock::new(ListState::default())),
                issued: Arc::new(AtomicU64::new(0)),
                revision: Arc::new(watch::channel(0).0),
            },
            poll_interval,
            poller: None,
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Start polling: one fetch now, then one per interval. Must be called
    /// from within a Tokio runtime. Mounting twice is a no-op.
    pub fn mount(&mut self) {
        if self.is_mounted() {
            return;
        }

        let fetcher = self.fetcher.clone();
        let period = self.poll_interval;
        info!("Polling clusters every {:?}", period);
        self.poller = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                fetcher.fetch().await;
            }
        }));
    }

    /// Stop polling. A fetch already in flight on the poller is dropped.
    pub fn unmount(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
            debug!("Stopped polling clusters");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.poller.is_some()
    }

    /// Fetch right away, outside the polling schedule.
    pub async fn refresh(&self) {
        self.fetcher.fetch().await;
    }

    pub async fn snapshot(&self) -> ListSnapshot {
        self.fetcher.state.read().await.snapshot.clone()
    }

    /// Notified whenever a fetch result is applied.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.fetcher.revision.subscribe()
    }

    pub fn can_delete(&self, cluster: &Cluster) -> bool {
        can_delete(&self.user, cluster)
    }

    /// Confirm, delete, then refresh. Failures go to `prompt` as an alert.
    pub async fn delete(&self, id: ClusterId, prompt: &dyn Prompt) -> DeleteOutcome {
        if !self.user.is_admin() {
            return DeleteOutcome::NotPermitted;
        }
        let listed = self
            .snapshot()
            .await
            .clusters
            .iter()
            .any(|c| c.id == id && can_delete(&self.user, c));
        if !listed {
            return DeleteOutcome::NotPermitted;
        }
        if !prompt.confirm(DELETE_CONFIRMATION) {
            debug!("Deletion of cluster {} cancelled", id);
            return DeleteOutcome::Cancelled;
        }

        match self.fetcher.api.delete_cluster(id).await {
            Ok(()) => {
                info!("Requested deletion of cluster {}", id);
                self.refresh().await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                warn!("Failed to delete cluster {}: {}", id, err);
                let message = err.user_message(DELETE_FAILED_MESSAGE);
                prompt.alert(&message);
                DeleteOutcome::Failed(message)
            }
        }
    }

    /// Tell the backend to end the session. Failures are only logged; the
    /// caller signs out locally either way.
    pub async fn logout(&mut self) {
        self.unmount();
        if let Err(err) = self.fetcher.api.logout().await {
            warn!("Logout request failed: {}", err);
        }
    }
}

impl Drop for ClusterList {
    fn drop(&mut self) {
        self.unmount();
    }
}
