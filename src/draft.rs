//! Fleet Draft
//!
//! Units composed locally by a customer or manager before they are
//! submitted in one atomic batch. Draft units have no id and can be
//! removed freely until submission.

use crate::domain::{DomainResult, Priority, TaskSpecific, Unit};
use crate::repository::RecordStore;

#[derive(Debug, Clone, Default)]
pub struct FleetDraft {
    customers: Vec<String>,
    selected_customer: String,
    units: Vec<Unit>,
}

impl FleetDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Customers created in this draft session
    pub fn customers(&self) -> &[String] {
        &self.customers
    }

    pub fn selected_customer(&self) -> &str {
        &self.selected_customer
    }

    /// Draft units, highest priority first
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Add and select a customer; blank names are ignored
    pub fn create_customer(&mut self, name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }
        self.selected_customer = name.to_string();
        self.customers.push(name.to_string());
        true
    }

    /// Switch the customer used for new units
    pub fn select_customer(&mut self, name: &str) {
        self.selected_customer = name.to_string();
    }

    /// Add a unit for the selected customer; blank unit numbers are ignored
    pub fn add_unit(&mut self, unit_number: &str, priority: Priority) -> bool {
        if unit_number.trim().is_empty() {
            return false;
        }
        self.units.push(Unit::new(unit_number, &self.selected_customer, priority));
        // Stable: same-priority units keep the order they were added in
        self.units.sort_by_key(|u| u.priority.rank());
        true
    }

    /// Drop a draft unit; out-of-range indexes are ignored
    pub fn remove_unit(&mut self, index: usize) -> Option<Unit> {
        if index < self.units.len() {
            Some(self.units.remove(index))
        } else {
            None
        }
    }

    /// Append a trimmed finding to a draft unit; all-blank findings are skipped
    pub fn add_task_specific(&mut self, index: usize, specific: &TaskSpecific) -> bool {
        if specific.is_blank() {
            return false;
        }
        match self.units.get_mut(index) {
            Some(unit) => {
                unit.task_specifics.push(specific.trimmed());
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Persist every draft unit in one batch
    ///
    /// Returns the created units with their ids and clears the draft. On
    /// failure the draft is left as it was. An empty draft writes nothing.
    pub async fn submit(&mut self, store: &dyn RecordStore) -> DomainResult<Vec<Unit>> {
        if self.units.is_empty() {
            return Ok(Vec::new());
        }

        let ids = store.batch_create(&self.units).await?;
        let created = std::mem::take(&mut self.units)
            .into_iter()
            .zip(ids)
            .map(|(unit, id)| unit.with_id(id))
            .collect();
        self.selected_customer.clear();
        Ok(created)
    }
}
