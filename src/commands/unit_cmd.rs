//! Unit Commands
//!
//! Loading the fleet, toggling completion, and the grouped view.

use crate::aggregate::CustomerGroups;
use crate::domain::{DomainResult, UnitId, UnitPatch};
use super::{report, FleetSession};

impl FleetSession {
    /// Replace the local list with a full fetch; returns the unit count
    pub async fn load(&mut self) -> DomainResult<usize> {
        match self.app.records.fetch_all().await {
            Ok(units) => {
                let count = units.len();
                self.fleet.store_replace_all(units);
                log::info!("Loaded {} unit(s)", count);
                Ok(count)
            }
            Err(e) => {
                report("load", &e);
                Err(e)
            }
        }
    }

    /// Set the completion flag remotely, then locally
    pub async fn mark_done(&mut self, unit_id: &UnitId, done: bool) -> DomainResult<()> {
        let patch = UnitPatch::done(done);
        if let Err(e) = self.app.records.update_fields(unit_id, &patch).await {
            report("mark_done", &e);
            return Err(e);
        }
        self.fleet.store_apply_patch(unit_id, &patch);
        Ok(())
    }

    /// Customer groups over the current list
    pub fn customer_groups(&self) -> CustomerGroups<'_> {
        self.fleet.groups()
    }
}
