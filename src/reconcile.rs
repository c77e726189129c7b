//! Local/Remote Reconciliation
//!
//! Folds the result of a successful remote write back into the in-memory
//! list so the view reflects it without a full re-fetch.

use std::sync::Arc;

use crate::domain::Entity;

/// Replace the entity with id `id` by its shallow merge with `patch`
///
/// Every other entry is the same `Arc` as before. Call only after the
/// matching remote write has resolved successfully.
pub fn apply_remote_result<T: Entity>(items: &[Arc<T>], id: &T::Id, patch: &T::Patch) -> Vec<Arc<T>> {
    items
        .iter()
        .map(|item| {
            if item.id() == Some(id) {
                Arc::new(item.patched(patch))
            } else {
                Arc::clone(item)
            }
        })
        .collect()
}
