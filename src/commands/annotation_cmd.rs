//! Annotation Commands
//!
//! Photo upload with position / tread depth notes:
//! compress + upload -> merge -> remote write -> reconcile.

use std::sync::atomic::Ordering;

use crate::attachments::BinaryFile;
use crate::domain::{DomainError, DomainResult, UnitId, UnitPatch};
use crate::merge::merge_annotation;
use super::{report, FleetSession};

impl FleetSession {
    /// Attach `files` to the unit under the annotation (`comment1`, `comment2`)
    ///
    /// With `mark_complete` the unit is also flagged done in the same write.
    /// Objects uploaded before a later failure stay in storage.
    pub async fn submit_annotation(
        &mut self,
        unit_id: &UnitId,
        files: &[BinaryFile],
        comment1: &str,
        comment2: &str,
        mark_complete: bool,
    ) -> DomainResult<()> {
        self.loading.store(true, Ordering::SeqCst);
        let result = self
            .upload_and_merge(unit_id, files, comment1, comment2, mark_complete)
            .await;
        self.loading.store(false, Ordering::SeqCst);

        if let Err(e) = &result {
            report("submit_annotation", e);
        }
        result
    }

    async fn upload_and_merge(
        &mut self,
        unit_id: &UnitId,
        files: &[BinaryFile],
        comment1: &str,
        comment2: &str,
        mark_complete: bool,
    ) -> DomainResult<()> {
        let unit_number = self
            .fleet
            .find(unit_id)
            .map(|u| u.unit_number.clone())
            .ok_or_else(|| DomainError::NotFound(format!("unit {}", unit_id)))?;

        let urls = self
            .app
            .attachments
            .upload_attachments(&unit_number, files)
            .await?;

        // Merge against the list as it is now, after the uploads resolved
        let existing = self
            .fleet
            .find(unit_id)
            .map(|u| u.comments.clone())
            .unwrap_or_default();
        let comments = merge_annotation(&existing, comment1, comment2, &urls);

        let mut patch = UnitPatch::comments(comments);
        if mark_complete {
            patch = patch.with_done(true);
        }

        self.app.records.update_fields(unit_id, &patch).await?;
        self.fleet.store_apply_patch(unit_id, &patch);
        log::info!("Annotation saved for unit {} with {} photo(s)", unit_number, urls.len());
        Ok(())
    }
}
