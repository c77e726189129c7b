//! Attachment Layer
//!
//! Photo handling for technician annotations: compress each selected file,
//! upload it to object storage and collect the retrieval URLs.

mod compress;
mod pipeline;
mod storage;

use async_trait::async_trait;
use base64::Engine;

use crate::domain::{DomainError, DomainResult};

pub use compress::{CompressionOptions, PassthroughCompressor};
pub use pipeline::{object_key, AttachmentPipeline};
pub use storage::LocalObjectStorage;

/// A selected file, held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl BinaryFile {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            bytes,
        }
    }

    /// Decode base64 content, with or without a `data:...;base64,` prefix
    pub fn from_data_url(name: &str, data: &str) -> DomainResult<Self> {
        let payload = match data.split_once(',') {
            Some((_, rest)) => rest,
            None => data,
        };
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| DomainError::InvalidInput(format!("Failed to decode {}: {}", name, e)))?;
        Ok(Self::new(name, bytes))
    }

    /// MIME type guessed from the file name
    pub fn content_type(&self) -> mime_guess::Mime {
        mime_guess::from_path(&self.name).first_or_octet_stream()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Image compression collaborator
#[async_trait]
pub trait Compressor: Send + Sync {
    /// Produce a file within `options`; the name is kept
    async fn compress(&self, file: &BinaryFile, options: &CompressionOptions) -> DomainResult<BinaryFile>;
}

/// Binary object storage collaborator
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `key` (overwriting) and return its retrieval URL
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> DomainResult<String>;
}
