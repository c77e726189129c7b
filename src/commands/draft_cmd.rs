//! Draft Commands

use crate::domain::DomainResult;
use crate::draft::FleetDraft;
use super::{report, FleetSession};

impl FleetSession {
    /// Submit a composed draft in one batch and show the new units
    pub async fn submit_draft(&mut self, draft: &mut FleetDraft) -> DomainResult<usize> {
        match draft.submit(self.app.records.as_ref()).await {
            Ok(created) => {
                let count = created.len();
                self.fleet.store_add_units(created);
                log::info!("Submitted {} unit(s)", count);
                Ok(count)
            }
            Err(e) => {
                report("submit_draft", &e);
                Err(e)
            }
        }
    }
}
