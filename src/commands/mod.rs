//! Session Commands
//!
//! User actions for one view session, organized by domain. Each action
//! runs its remote write first and reconciles local state only after the
//! write succeeds. Failures are logged once here and handed back to the
//! caller; nothing is retried or rolled back.

mod unit_cmd;
mod annotation_cmd;
mod draft_cmd;
mod profile_cmd;

#[cfg(test)]
mod tests;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::domain::{DomainError, Unit};
use crate::store::FleetStore;
use crate::AppState;

pub use profile_cmd::ensure_profile;

/// One view session: shared clients plus a private unit list
pub struct FleetSession {
    app: Arc<AppState>,
    fleet: FleetStore,
    loading: Arc<AtomicBool>,
}

impl FleetSession {
    pub fn new(app: Arc<AppState>) -> Self {
        Self {
            app,
            fleet: FleetStore::new(),
            loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn units(&self) -> &[Arc<Unit>] {
        self.fleet.units()
    }

    pub fn fleet(&self) -> &FleetStore {
        &self.fleet
    }

    /// True while an attachment upload is in progress
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Shared handle to the loading flag, readable while an action runs
    pub fn loading_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.loading)
    }
}

/// Log a failed action with its category
fn report(action: &str, err: &DomainError) {
    log::error!("{} failed [{}]: {}", action, err.category(), err);
}
