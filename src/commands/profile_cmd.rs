//! Profile Commands
//!
//! First sign-in bookkeeping for role-scoped user profiles.

use chrono::Utc;

use crate::domain::{AuthIdentity, DomainResult, Role, UserProfile};
use crate::repository::ProfileStore;
use super::report;

/// Create the profile document unless it already exists
///
/// Returns `true` when a new document was written.
pub async fn ensure_profile(
    profiles: &dyn ProfileStore,
    role: Role,
    identity: &AuthIdentity,
) -> DomainResult<bool> {
    let collection = role.collection();

    let existing = profiles.find_profile(collection, &identity.uid).await.map_err(|e| {
        report("ensure_profile", &e);
        e
    })?;
    if existing.is_some() {
        return Ok(false);
    }

    let profile = UserProfile::from_identity(identity, Utc::now());
    profiles
        .put_profile(collection, &identity.uid, &profile)
        .await
        .map_err(|e| {
            report("ensure_profile", &e);
            e
        })?;

    log::info!("Created {} profile for {}", collection, identity.uid);
    Ok(true)
}
