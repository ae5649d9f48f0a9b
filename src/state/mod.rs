use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{dao::team_store::TeamStore, error::ServiceError};

/// Shared handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Central application state carrying the installed storage backend.
///
/// The store slot is the only shared mutable resource; every operation
/// receives the state explicitly instead of reaching for globals, and takes
/// its own `Arc` handle to the store for the duration of one request.
pub struct AppState {
    team_store: RwLock<Option<Arc<dyn TeamStore>>>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new() -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            team_store: RwLock::new(None),
            degraded: degraded_tx,
        })
    }

    /// Obtain a handle to the current team store, if one is installed.
    pub async fn team_store(&self) -> Option<Arc<dyn TeamStore>> {
        let guard = self.team_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current team store or fail with a degraded-mode error.
    pub async fn require_team_store(&self) -> Result<Arc<dyn TeamStore>, ServiceError> {
        self.team_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new team store implementation and leave degraded mode.
    pub async fn install_team_store(&self, store: Arc<dyn TeamStore>) {
        {
            let mut guard = self.team_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current team store and enter degraded mode.
    pub async fn clear_team_store(&self) {
        {
            let mut guard = self.team_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.team_store.read().await;
        guard.is_none()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Publish the degraded flag to watchers.
    pub fn update_degraded(&self, degraded: bool) {
        self.degraded.send_replace(degraded);
    }
}
