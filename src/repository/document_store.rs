//! SQLite Document Store
//!
//! JSON documents grouped by collection, one row per document.
//! Batch creates and field merges each run inside a single transaction.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, Unit, UnitId, UnitPatch, UserProfile};
use super::db::init_db;
use super::document::{document_to_unit, merge_top_level, patch_to_fields, unit_to_document};
use super::traits::{ProfileStore, RecordStore, FLEETS_COLLECTION};

/// New opaque document id
pub(super) fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// SQLite implementation of the document store
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDocumentStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Open the database file and run migrations
    pub fn open(db_path: &Path) -> DomainResult<Self> {
        let conn = init_db(db_path)?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }

    fn read_body(conn: &Connection, collection: &str, id: &str) -> rusqlite::Result<Option<String>> {
        conn.query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
            |row| row.get(0),
        )
        .optional()
    }
}

#[async_trait]
impl RecordStore for SqliteDocumentStore {
    async fn fetch_all(&self) -> DomainResult<Vec<Unit>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn
            .prepare("SELECT id, body FROM documents WHERE collection = ?1 ORDER BY seq ASC")
            .map_err(|e| DomainError::Fetch(e.to_string()))?;
        let rows = stmt
            .query_map(params![FLEETS_COLLECTION], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| DomainError::Fetch(e.to_string()))?;

        let mut units = Vec::new();
        for row in rows {
            let (id, body) = row.map_err(|e| DomainError::Fetch(e.to_string()))?;
            let parsed = serde_json::from_str::<Value>(&body)
                .map_err(|e| DomainError::Fetch(format!("Malformed unit document {}: {}", id, e)))
                .and_then(|value| document_to_unit(&id, value));
            match parsed {
                Ok(unit) => units.push(unit),
                Err(e) => log::warn!("Skipping unit document: {}", e),
            }
        }
        Ok(units)
    }

    async fn update_fields(&self, unit_id: &UnitId, patch: &UnitPatch) -> DomainResult<()> {
        let fields = patch_to_fields(patch)?;
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().map_err(|e| DomainError::Write(e.to_string()))?;

        let body = Self::read_body(&tx, FLEETS_COLLECTION, unit_id.as_str())
            .map_err(|e| DomainError::Write(e.to_string()))?
            .ok_or_else(|| DomainError::Write(format!("No unit document {}", unit_id)))?;

        let mut body: Value = serde_json::from_str(&body)
            .map_err(|e| DomainError::Write(format!("Stored unit {} is not JSON: {}", unit_id, e)))?;
        merge_top_level(&mut body, fields)?;

        tx.execute(
            "UPDATE documents SET body = ?1, updated_at = ?2 WHERE collection = ?3 AND id = ?4",
            params![body.to_string(), now_millis(), FLEETS_COLLECTION, unit_id.as_str()],
        )
        .map_err(|e| DomainError::Write(e.to_string()))?;

        tx.commit().map_err(|e| DomainError::Write(e.to_string()))
    }

    async fn batch_create(&self, units: &[Unit]) -> DomainResult<Vec<UnitId>> {
        let bodies = units
            .iter()
            .map(unit_to_document)
            .collect::<DomainResult<Vec<Value>>>()?;

        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().map_err(|e| DomainError::Write(e.to_string()))?;
        let created_at = now_millis();

        let mut ids = Vec::with_capacity(bodies.len());
        for body in bodies {
            let id = new_document_id();
            tx.execute(
                "INSERT INTO documents (collection, id, body, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![FLEETS_COLLECTION, id, body.to_string(), created_at],
            )
            .map_err(|e| DomainError::Write(e.to_string()))?;
            ids.push(UnitId::new(id));
        }

        // Dropping `tx` on any earlier error rolls every insert back
        tx.commit().map_err(|e| DomainError::Write(e.to_string()))?;
        Ok(ids)
    }
}

#[async_trait]
impl ProfileStore for SqliteDocumentStore {
    async fn find_profile(&self, collection: &str, uid: &str) -> DomainResult<Option<UserProfile>> {
        let conn = self.conn.lock().await;
        let body = Self::read_body(&conn, collection, uid)
            .map_err(|e| DomainError::Fetch(e.to_string()))?;

        body.map(|body| {
            serde_json::from_str(&body)
                .map_err(|e| DomainError::Fetch(format!("Malformed profile {}/{}: {}", collection, uid, e)))
        })
        .transpose()
    }

    async fn put_profile(&self, collection: &str, uid: &str, profile: &UserProfile) -> DomainResult<()> {
        let body = serde_json::to_string(profile)
            .map_err(|e| DomainError::Write(format!("Failed to encode profile: {}", e)))?;
        let now = now_millis();

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO documents (collection, id, body, created_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(collection, id) DO UPDATE SET body = excluded.body, updated_at = ?4",
            params![collection, uid, body, now],
        )
        .map_err(|e| DomainError::Write(e.to_string()))?;
        Ok(())
    }
}
