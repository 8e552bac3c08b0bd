use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::warn;

use cgo_core::quota::RequestLimiter;
use cgo_core::session::Session;
use cgo_core::settings::read_settings;
use cgo_core::storage::{FileQuotaStore, SessionStore};
use cgo_suggest::Engine;

use crate::config::Config;

/// Pick the engine from server flags and the AI settings in the data dir.
pub fn engine_from_config(config: &Config) -> Engine {
    let settings = read_settings(&config.data_dir()).with_env();
    Engine::configure(settings, config.local_only, config.request_timeout())
}

/// Server state shared across handlers.
pub struct ServerState {
    pub engine: Engine,
    pub session: Mutex<Session>,
    pub limiter: Mutex<RequestLimiter<FileQuotaStore>>,
    store: SessionStore,
    organizing: AtomicBool,
}

impl ServerState {
    /// Load the saved session from the data dir and wire up the quota store.
    pub fn new(config: &Config, engine: Engine) -> Self {
        let dir = config.data_dir();
        let store = SessionStore::new(&dir);
        let session = store
            .load()
            .map(Session::from_snapshot)
            .unwrap_or_default();
        let limiter = RequestLimiter::new(config.quota_policy(), FileQuotaStore::new(&dir));

        Self {
            engine,
            session: Mutex::new(session),
            limiter: Mutex::new(limiter),
            store,
            organizing: AtomicBool::new(false),
        }
    }

    /// Write the session out. Failures are logged and otherwise ignored.
    pub fn persist(&self, session: &Session) {
        if let Err(e) = self.store.save(&session.snapshot()) {
            warn!(error = %e, "failed to save session");
        }
    }

    /// Claim the single organize slot, or `None` if it is taken.
    pub fn begin_organize(&self) -> Option<OrganizeGuard<'_>> {
        self.organizing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| OrganizeGuard(&self.organizing))
    }
}

/// Releases the organize slot when dropped.
pub struct OrganizeGuard<'a>(&'a AtomicBool);

impl Drop for OrganizeGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
