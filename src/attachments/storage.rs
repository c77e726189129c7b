//! Filesystem-backed object storage
//!
//! Objects live at `{root}/{key}`; URLs are `{base_url}/{encoded key}`.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::{Component, Path, PathBuf};

use crate::domain::{DomainError, DomainResult};
use super::ObjectStorage;

/// Characters escaped inside one key segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

pub struct LocalObjectStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalObjectStorage {
    /// Serve objects as `file://` URLs under `root`
    ///
    /// A relative root is resolved against the working directory so the
    /// URL path is absolute.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        let base_url = file_url(&root);
        Self::with_base_url(root, &base_url)
    }

    /// Serve objects under a public base URL, e.g. a static file host
    pub fn with_base_url(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Retrieval URL for a key
    pub fn url_for(&self, key: &str) -> String {
        let encoded: Vec<String> = key
            .split('/')
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect();
        format!("{}/{}", self.base_url, encoded.join("/"))
    }

    /// Keys must stay inside the root
    fn resolve(&self, key: &str) -> DomainResult<PathBuf> {
        let relative = Path::new(key);
        let escapes = key.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(DomainError::Upload {
                key: key.to_string(),
                reason: "key must be a relative path without '..'".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

/// `file://` URL of an absolute path, one encoded segment per component
fn file_url(path: &Path) -> String {
    let segments: String = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .map(|name| format!("/{}", utf8_percent_encode(&name, SEGMENT)))
        .collect();
    format!("file://{}", segments)
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> DomainResult<String> {
        let path = self.resolve(key)?;
        let upload_err = |e: std::io::Error| DomainError::Upload {
            key: key.to_string(),
            reason: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(upload_err)?;
        }
        tokio::fs::write(&path, bytes).await.map_err(upload_err)?;

        log::debug!("Stored {} ({} bytes, {})", key, bytes.len(), content_type);
        Ok(self.url_for(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::with_base_url(dir.path(), "https://files.example.com/");

        let url = storage.put("T-100/front tire.jpg", b"jpeg", "image/jpeg").await.unwrap();

        assert_eq!(url, "https://files.example.com/T-100/front%20tire.jpg");
        let stored = std::fs::read(dir.path().join("T-100").join("front tire.jpg")).unwrap();
        assert_eq!(stored, b"jpeg");
    }

    #[tokio::test]
    async fn test_same_key_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path());

        let first = storage.put("T-1/a.jpg", b"one", "image/jpeg").await.unwrap();
        let second = storage.put("T-1/a.jpg", b"two", "image/jpeg").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(dir.path().join("T-1/a.jpg")).unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_rejects_escaping_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path());

        for key in ["../evil.jpg", "/etc/passwd", ""] {
            let err = storage.put(key, b"x", "image/jpeg").await.unwrap_err();
            assert_eq!(err.category(), "upload");
        }
    }

    #[test]
    fn test_file_url_default() {
        let storage = LocalObjectStorage::new("/srv/objects");
        assert_eq!(storage.url_for("T-9/x.png"), "file:///srv/objects/T-9/x.png");
    }

    #[test]
    fn test_file_url_encodes_root() {
        let storage = LocalObjectStorage::new("/tmp/my photos");
        assert_eq!(storage.url_for("T-1/a.jpg"), "file:///tmp/my%20photos/T-1/a.jpg");
    }

    #[test]
    fn test_relative_root_becomes_absolute() {
        let storage = LocalObjectStorage::new("fleet-data/objects");
        assert!(storage.root().is_absolute());

        let cwd = std::env::current_dir().unwrap();
        let expected = format!("{}/T-1/a.jpg", file_url(&cwd.join("fleet-data/objects")));
        assert_eq!(storage.url_for("T-1/a.jpg"), expected);
        assert!(expected.starts_with("file:///"));
        assert!(expected.ends_with("/fleet-data/objects/T-1/a.jpg"));
    }
}
