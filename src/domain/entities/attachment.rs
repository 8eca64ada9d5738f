//! Message attachment value and the blob store capability.
//!
//! Attachment bytes never touch the database; they live in an external blob
//! store and messages reference them by URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default maximum attachment size in bytes (25MB).
pub const MAX_ATTACHMENT_SIZE: usize = 26_214_400;

/// Fallback MIME type for unknown content.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// An attachment that has been written to the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAttachment {
    /// Storage key inside the bucket
    pub key: String,

    /// Durable URL clients fetch the content from
    pub url: String,

    /// MIME type (e.g., "image/png", "application/pdf")
    pub content_type: String,

    /// Size in bytes
    pub size: usize,
}

impl StoredAttachment {
    /// Check if this attachment is an image.
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Get human-readable file size.
    pub fn human_size(&self) -> String {
        let size = self.size as f64;
        if size < 1024.0 {
            format!("{} B", self.size)
        } else if size < 1024.0 * 1024.0 {
            format!("{:.1} KB", size / 1024.0)
        } else {
            format!("{:.1} MB", size / (1024.0 * 1024.0))
        }
    }
}

/// Lowercase alphanumeric extension of a filename, if it has a usable one.
pub fn file_extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > 10 {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Blob store failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BlobStoreError {
    #[error("blob store rejected the write: {0}")]
    Rejected(String),

    #[error("blob store unavailable: {0}")]
    Unavailable(String),
}

/// External object storage the attachment uploader delegates to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `body` under `key` and return its public URL.
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String, BlobStoreError>;

    /// Remove an object. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), BlobStoreError>;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}
