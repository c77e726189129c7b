//! Compress-then-upload pipeline
//!
//! Files in one batch are compressed concurrently and awaited together,
//! then uploaded concurrently and awaited together. URLs are returned in
//! input order whatever order the uploads finish in.

use futures::future::try_join_all;
use std::sync::Arc;

use crate::domain::{DomainError, DomainResult};
use super::{BinaryFile, CompressionOptions, Compressor, ObjectStorage};

/// Storage key for a file attached to a unit
///
/// Two files with the same name for the same unit share a key and the
/// later upload replaces the earlier one.
pub fn object_key(unit_key: &str, file_name: &str) -> String {
    format!("{}/{}", unit_key, file_name)
}

#[derive(Clone)]
pub struct AttachmentPipeline {
    compressor: Arc<dyn Compressor>,
    storage: Arc<dyn ObjectStorage>,
    options: CompressionOptions,
}

impl AttachmentPipeline {
    pub fn new(
        compressor: Arc<dyn Compressor>,
        storage: Arc<dyn ObjectStorage>,
        options: CompressionOptions,
    ) -> Self {
        Self {
            compressor,
            storage,
            options,
        }
    }

    pub fn options(&self) -> &CompressionOptions {
        &self.options
    }

    /// Compress and upload `files`, returning one URL per file in order
    ///
    /// A compression failure aborts the batch before anything is uploaded.
    /// An upload failure leaves already-stored objects in place.
    pub async fn upload_attachments(&self, unit_key: &str, files: &[BinaryFile]) -> DomainResult<Vec<String>> {
        if files.is_empty() {
            return Err(DomainError::InvalidInput("no files selected".to_string()));
        }

        let compressed = try_join_all(
            files
                .iter()
                .map(|file| self.compressor.compress(file, &self.options)),
        )
        .await?;
        log::debug!("Compressed {} file(s) for {}", compressed.len(), unit_key);

        let urls = try_join_all(compressed.iter().map(|file| {
            let key = object_key(unit_key, &file.name);
            let content_type = file.content_type();
            async move {
                self.storage
                    .put(&key, &file.bytes, content_type.essence_str())
                    .await
            }
        }))
        .await?;

        log::info!("Uploaded {} attachment(s) for {}", urls.len(), unit_key);
        Ok(urls)
    }
}
