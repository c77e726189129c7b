//! Fleet Track
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Document store abstractions and implementations
//! - attachments: Photo compression and upload
//! - merge / aggregate / reconcile: Pure data pipeline steps
//! - commands: User actions tying the layers together for one session

use std::sync::Arc;

pub mod domain;
pub mod repository;
pub mod attachments;
pub mod merge;
pub mod aggregate;
pub mod reconcile;
pub mod store;
pub mod draft;
pub mod gallery;
pub mod config;
pub mod commands;

use attachments::{AttachmentPipeline, LocalObjectStorage, PassthroughCompressor};
use commands::FleetSession;
use config::FleetConfig;
use domain::{AuthIdentity, DomainError, DomainResult, Role};
use repository::{ProfileStore, RecordStore, SqliteDocumentStore};

/// Clients shared by every session
///
/// Built once at startup and handed out by reference.
pub struct AppState {
    pub records: Arc<dyn RecordStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub attachments: AttachmentPipeline,
}

impl AppState {
    pub fn new(
        records: Arc<dyn RecordStore>,
        profiles: Arc<dyn ProfileStore>,
        attachments: AttachmentPipeline,
    ) -> Self {
        Self {
            records,
            profiles,
            attachments,
        }
    }
}

pub struct FleetApp {
    state: Arc<AppState>,
}

impl FleetApp {
    /// Start logging, open the store and object storage described by `config`
    pub fn init(config: &FleetConfig) -> DomainResult<Self> {
        if config.logging.enabled {
            if let Err(e) = rolling_logger::init_logger(config.log_dir(), &config.logging.app_name) {
                eprintln!("Logger not installed: {}", e);
            }
        }

        let db_path = config.database_path();
        if db_path != std::path::Path::new(config::IN_MEMORY_DB) {
            std::fs::create_dir_all(&config.data_dir).map_err(|e| {
                DomainError::Config(format!("Failed to create {}: {}", config.data_dir.display(), e))
            })?;
        }
        let documents = Arc::new(SqliteDocumentStore::open(&db_path)?);

        let storage_root = config.storage_root();
        let storage = match &config.storage.public_base_url {
            Some(base_url) => LocalObjectStorage::with_base_url(storage_root, base_url),
            None => LocalObjectStorage::new(storage_root),
        };
        let attachments = AttachmentPipeline::new(
            Arc::new(PassthroughCompressor),
            Arc::new(storage),
            config.compression.clone(),
        );

        log::info!("Fleet store opened at {}", db_path.display());
        Ok(Self::with_state(AppState::new(documents.clone(), documents, attachments)))
    }

    /// Wrap already-constructed clients
    pub fn with_state(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// A view session with its own, initially empty, unit list
    pub fn session(&self) -> FleetSession {
        FleetSession::new(Arc::clone(&self.state))
    }

    /// Write the profile document on first sign-in
    pub async fn ensure_profile(&self, role: Role, identity: &AuthIdentity) -> DomainResult<bool> {
        commands::ensure_profile(self.state.profiles.as_ref(), role, identity).await
    }
}
