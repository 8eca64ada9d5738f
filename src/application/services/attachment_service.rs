//! Attachment Service
//!
//! Accepts raw file bytes, writes them to the blob store under a generated
//! key and returns where they ended up.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::config::StorageSettings;
use crate::domain::{file_extension, BlobStore, BlobStoreError, StoredAttachment, OCTET_STREAM};
use crate::infrastructure::metrics;

/// Raw attachment as received from the client.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    /// Content type the client declared, if any
    pub declared_type: Option<String>,
}

/// Attachment service trait
#[async_trait]
pub trait AttachmentService: Send + Sync {
    /// Store the attachment on behalf of `owner_id`
    async fn upload(&self, owner_id: i64, upload: AttachmentUpload) -> Result<StoredAttachment, UploadError>;

    /// Best-effort removal of a stored blob
    async fn discard(&self, key: &str);
}

/// Upload errors
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Attachment is empty")]
    Empty,

    #[error("Attachment exceeds the maximum size of {max} bytes")]
    TooLarge { max: usize },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// AttachmentService implementation over a `BlobStore`
pub struct AttachmentServiceImpl {
    store: Arc<dyn BlobStore>,
    max_bytes: usize,
    timeout: Duration,
}

impl AttachmentServiceImpl {
    pub fn new(store: Arc<dyn BlobStore>, settings: &StorageSettings) -> Self {
        Self {
            store,
            max_bytes: settings.max_upload_bytes,
            timeout: settings.upload_timeout(),
        }
    }
}

/// Content type for the stored object.
///
/// A declared type wins unless it is missing or the generic octet-stream;
/// then the filename decides.
pub fn resolve_content_type(file_name: &str, declared: Option<&str>) -> String {
    match declared.map(str::trim).filter(|t| !t.is_empty()) {
        Some(declared) if !declared.eq_ignore_ascii_case(OCTET_STREAM) => declared.to_ascii_lowercase(),
        _ => mime_guess::from_path(file_name)
            .first_raw()
            .unwrap_or(OCTET_STREAM)
            .to_string(),
    }
}

/// `attachments/{owner}/{uuid}[.ext]`
pub fn storage_key(owner_id: i64, file_name: &str) -> String {
    let id = uuid::Uuid::new_v4();
    match file_extension(file_name) {
        Some(ext) => format!("attachments/{}/{}.{}", owner_id, id, ext),
        None => format!("attachments/{}/{}", owner_id, id),
    }
}

#[async_trait]
impl AttachmentService for AttachmentServiceImpl {
    async fn upload(&self, owner_id: i64, upload: AttachmentUpload) -> Result<StoredAttachment, UploadError> {
        if upload.bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if upload.bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge { max: self.max_bytes });
        }

        let content_type = resolve_content_type(&upload.file_name, upload.declared_type.as_deref());
        let key = storage_key(owner_id, &upload.file_name);
        let size = upload.bytes.len();
        let backend = self.store.backend();

        let started = Instant::now();
        let outcome = tokio::time::timeout(
            self.timeout,
            self.store.put(&key, upload.bytes, &content_type),
        )
        .await;
        let elapsed = started.elapsed().as_secs_f64();

        let url = match outcome {
            Ok(Ok(url)) => {
                metrics::record_upload(backend, "ok", elapsed);
                url
            }
            Ok(Err(err)) => {
                let label = match err {
                    BlobStoreError::Rejected(_) => "rejected",
                    BlobStoreError::Unavailable(_) => "unavailable",
                };
                metrics::record_upload(backend, label, elapsed);
                tracing::warn!(owner_id, key = %key, error = %err, "Attachment upload failed");
                return Err(UploadError::StorageUnavailable(err.to_string()));
            }
            Err(_) => {
                metrics::record_upload(backend, "timeout", elapsed);
                tracing::warn!(owner_id, key = %key, timeout = ?self.timeout, "Attachment upload timed out");
                return Err(UploadError::StorageUnavailable(format!(
                    "upload timed out after {:?}",
                    self.timeout
                )));
            }
        };

        if url.is_empty() {
            return Err(UploadError::StorageUnavailable(
                "blob store returned an empty URL".into(),
            ));
        }

        let stored = StoredAttachment {
            key,
            url,
            content_type,
            size,
        };
        tracing::debug!(
            owner_id,
            key = %stored.key,
            size = %stored.human_size(),
            content_type = %stored.content_type,
            "Attachment stored"
        );

        Ok(stored)
    }

    async fn discard(&self, key: &str) {
        if let Err(err) = self.store.delete(key).await {
            tracing::warn!(key, error = %err, "Failed to discard orphaned attachment");
        }
    }
}
