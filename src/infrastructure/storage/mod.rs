//! Blob Storage
//!
//! Implementations of the `BlobStore` capability: Amazon S3 (or any
//! S3-compatible endpoint) and a process-local store for development.

mod memory;
mod s3;

use std::sync::Arc;

use crate::config::{StorageBackend, StorageSettings};
use crate::domain::BlobStore;

pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;

/// Build the blob store selected by configuration.
pub async fn create_blob_store(settings: &StorageSettings) -> Arc<dyn BlobStore> {
    match settings.backend {
        StorageBackend::S3 => Arc::new(S3BlobStore::connect(settings).await),
        StorageBackend::Memory => Arc::new(MemoryBlobStore::new(
            settings
                .public_base_url
                .clone()
                .unwrap_or_else(|| "memory://attachments".to_string()),
        )),
    }
}
