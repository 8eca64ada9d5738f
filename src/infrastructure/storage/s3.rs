//! S3 blob store.

use async_trait::async_trait;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::config::StorageSettings;
use crate::domain::{BlobStore, BlobStoreError};

/// Writes attachments to an S3 bucket and hands back their public URL.
#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    base_url: String,
}

impl S3BlobStore {
    /// Configured AWS S3 client.
    ///
    /// Static credentials are used when both halves are configured; otherwise
    /// the default AWS credential chain applies.
    pub async fn connect(settings: &StorageSettings) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()));

        if let (Some(access_key_id), Some(secret_access_key)) =
            (&settings.access_key_id, &settings.secret_access_key)
        {
            let credentials = Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "roomchat_storage",
            );
            loader = loader.credentials_provider(credentials);
        }

        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint) = settings.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
            // MinIO and LocalStack want path-style addressing
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: settings.bucket.clone(),
            base_url: public_base_url(settings),
        }
    }

    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

/// Public URL prefix for objects of the configured bucket.
fn public_base_url(settings: &StorageSettings) -> String {
    if let Some(base) = settings.public_base_url.as_deref().filter(|b| !b.is_empty()) {
        return base.trim_end_matches('/').to_string();
    }
    match settings.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
        Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), settings.bucket),
        None => format!(
            "https://{}.s3.{}.amazonaws.com",
            settings.bucket, settings.region
        ),
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String, BlobStoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(bucket = %self.bucket, key, error = ?e, "S3 put_object failed");
                BlobStoreError::Unavailable(e.to_string())
            })?;

        Ok(self.object_url(key))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobStoreError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| BlobStoreError::Unavailable(e.to_string()))?;

        Ok(())
    }

    fn backend(&self) -> &'static str {
        "s3"
    }
}
