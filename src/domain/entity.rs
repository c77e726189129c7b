//! Domain Layer - Core Entity Trait
//!
//! Every record kept in the document store has a store-assigned identifier
//! and can absorb a partial field update.

use thiserror::Error;

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Clone + Eq + std::hash::Hash + Send + Sync;

    /// Partial update applied with shallow-merge semantics
    type Patch;

    /// Returns the entity's identifier, `None` until the store assigns one
    fn id(&self) -> Option<&Self::Id>;

    /// Returns a copy with every field set in `patch` replaced
    fn patched(&self, patch: &Self::Patch) -> Self;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    /// Store read failed
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// One file in an attachment batch failed to compress
    #[error("Compression error for {file}: {reason}")]
    Compression { file: String, reason: String },

    /// One file in an attachment batch failed to upload
    #[error("Upload error for {key}: {reason}")]
    Upload { key: String, reason: String },

    /// Store update or batch create failed
    #[error("Write error: {0}")]
    Write(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DomainError {
    /// Short category name used in log lines
    pub fn category(&self) -> &'static str {
        match self {
            DomainError::Fetch(_) => "fetch",
            DomainError::Compression { .. } => "compression",
            DomainError::Upload { .. } => "upload",
            DomainError::Write(_) => "write",
            DomainError::NotFound(_) => "not_found",
            DomainError::InvalidInput(_) => "invalid_input",
            DomainError::Config(_) => "config",
            DomainError::Io(_) => "io",
        }
    }
}
