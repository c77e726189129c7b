//! Compression options and the built-in compressor

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};
use super::{BinaryFile, Compressor};

/// Target limits for a compressed photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionOptions {
    pub max_size_bytes: usize,
    /// Longest edge in pixels
    pub max_dimension: u32,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            max_size_bytes: 1024 * 1024,
            max_dimension: 1920,
        }
    }
}

/// Accepts images already within the size target, rejects everything else
///
/// Stands in for a real resampling compressor; it never re-encodes.
#[derive(Debug, Default, Clone)]
pub struct PassthroughCompressor;

#[async_trait]
impl Compressor for PassthroughCompressor {
    async fn compress(&self, file: &BinaryFile, options: &CompressionOptions) -> DomainResult<BinaryFile> {
        let mime = file.content_type();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(DomainError::Compression {
                file: file.name.clone(),
                reason: format!("not an image ({})", mime.essence_str()),
            });
        }
        if file.len() > options.max_size_bytes {
            return Err(DomainError::Compression {
                file: file.name.clone(),
                reason: format!("{} bytes exceeds the {} byte target", file.len(), options.max_size_bytes),
            });
        }
        Ok(file.clone())
    }
}
