//! Session Unit Store
//!
//! The in-memory unit list owned by one view session. It is replaced
//! wholesale on load and patched through reconciliation after writes.

use std::sync::Arc;

use crate::aggregate::{group_by_customer, CustomerGroups};
use crate::domain::{Unit, UnitId, UnitPatch};
use crate::reconcile::apply_remote_result;

#[derive(Debug, Clone, Default)]
pub struct FleetStore {
    units: Vec<Arc<Unit>>,
    /// Bumped on every change so views can tell when to re-render
    version: u32,
}

impl FleetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn units(&self) -> &[Arc<Unit>] {
        &self.units
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn find(&self, unit_id: &UnitId) -> Option<&Arc<Unit>> {
        self.units.iter().find(|u| u.id.as_ref() == Some(unit_id))
    }

    /// Customer groups derived from the current list
    pub fn groups(&self) -> CustomerGroups<'_> {
        group_by_customer(&self.units)
    }

    // ========================
    // Store Helper Functions
    // ========================

    /// Replace every unit with a fresh fetch
    pub fn store_replace_all(&mut self, units: Vec<Unit>) {
        self.units = units.into_iter().map(Arc::new).collect();
        self.bump();
    }

    /// Append units that were just persisted
    pub fn store_add_units(&mut self, units: Vec<Unit>) {
        self.units.extend(units.into_iter().map(Arc::new));
        self.bump();
    }

    /// Reconcile a successful remote write
    pub fn store_apply_patch(&mut self, unit_id: &UnitId, patch: &UnitPatch) {
        self.units = apply_remote_result(&self.units, unit_id, patch);
        self.bump();
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}
