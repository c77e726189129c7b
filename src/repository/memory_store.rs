//! In-Memory Document Store
//!
//! Same document semantics as the SQLite store, held in process.
//! Failure switches let callers exercise the error paths.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, Unit, UnitId, UnitPatch, UserProfile};
use super::document::{document_to_unit, merge_top_level, patch_to_fields, unit_to_document};
use super::document_store::new_document_id;
use super::traits::{ProfileStore, RecordStore, FLEETS_COLLECTION};

#[derive(Default)]
pub struct MemoryDocumentStore {
    /// Collection name -> documents in insertion order
    collections: Mutex<HashMap<String, Vec<(String, Value)>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following read fail until switched off
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every following write fail until switched off
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Insert a raw document body, bypassing the schema
    pub async fn insert_raw(&self, collection: &str, id: &str, body: Value) {
        let mut collections = self.collections.lock().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push((id.to_string(), body));
    }

    /// Raw document body, if present
    pub async fn raw(&self, collection: &str, id: &str) -> Option<Value> {
        let collections = self.collections.lock().await;
        collections
            .get(collection)?
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(_, body)| body.clone())
    }

    fn check_read(&self) -> DomainResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::Fetch("store unavailable".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> DomainResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::Write("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryDocumentStore {
    async fn fetch_all(&self) -> DomainResult<Vec<Unit>> {
        self.check_read()?;
        let collections = self.collections.lock().await;
        let Some(docs) = collections.get(FLEETS_COLLECTION) else {
            return Ok(Vec::new());
        };

        let mut units = Vec::with_capacity(docs.len());
        for (id, body) in docs {
            match document_to_unit(id, body.clone()) {
                Ok(unit) => units.push(unit),
                Err(e) => log::warn!("Skipping unit document: {}", e),
            }
        }
        Ok(units)
    }

    async fn update_fields(&self, unit_id: &UnitId, patch: &UnitPatch) -> DomainResult<()> {
        self.check_write()?;
        let fields = patch_to_fields(patch)?;

        let mut collections = self.collections.lock().await;
        let body = collections
            .get_mut(FLEETS_COLLECTION)
            .and_then(|docs| docs.iter_mut().find(|(id, _)| id == unit_id.as_str()))
            .map(|(_, body)| body)
            .ok_or_else(|| DomainError::Write(format!("No unit document {}", unit_id)))?;

        merge_top_level(body, fields)
    }

    async fn batch_create(&self, units: &[Unit]) -> DomainResult<Vec<UnitId>> {
        self.check_write()?;
        let bodies = units
            .iter()
            .map(unit_to_document)
            .collect::<DomainResult<Vec<Value>>>()?;

        let mut collections = self.collections.lock().await;
        let docs = collections.entry(FLEETS_COLLECTION.to_string()).or_default();

        let mut ids = Vec::with_capacity(bodies.len());
        for body in bodies {
            let id = new_document_id();
            docs.push((id.clone(), body));
            ids.push(UnitId::new(id));
        }
        Ok(ids)
    }
}

#[async_trait]
impl ProfileStore for MemoryDocumentStore {
    async fn find_profile(&self, collection: &str, uid: &str) -> DomainResult<Option<UserProfile>> {
        self.check_read()?;
        self.raw(collection, uid)
            .await
            .map(|body| {
                serde_json::from_value(body)
                    .map_err(|e| DomainError::Fetch(format!("Malformed profile {}/{}: {}", collection, uid, e)))
            })
            .transpose()
    }

    async fn put_profile(&self, collection: &str, uid: &str, profile: &UserProfile) -> DomainResult<()> {
        self.check_write()?;
        let body = serde_json::to_value(profile)
            .map_err(|e| DomainError::Write(format!("Failed to encode profile: {}", e)))?;

        let mut collections = self.collections.lock().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|(id, _)| id == uid) {
            Some((_, existing)) => *existing = body,
            None => docs.push((uid.to_string(), body)),
        }
        Ok(())
    }
}
