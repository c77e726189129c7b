//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for the external document store.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use crate::domain::{DomainResult, Unit, UnitId, UnitPatch, UserProfile};

/// Collection holding one document per unit
pub const FLEETS_COLLECTION: &str = "fleets";

/// Access to the `fleets` collection
///
/// Failures are reported once and never retried.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Full collection scan
    async fn fetch_all(&self) -> DomainResult<Vec<Unit>>;

    /// Merge the fields set in `patch` into an existing document
    async fn update_fields(&self, unit_id: &UnitId, patch: &UnitPatch) -> DomainResult<()>;

    /// Persist every unit or none; ids come back in input order
    async fn batch_create(&self, units: &[Unit]) -> DomainResult<Vec<UnitId>>;
}

/// Access to role-scoped profile collections
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_profile(&self, collection: &str, uid: &str) -> DomainResult<Option<UserProfile>>;

    async fn put_profile(&self, collection: &str, uid: &str, profile: &UserProfile) -> DomainResult<()>;
}
