//! S3 object storage.

use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use bytes::Bytes;
use uuid::Uuid;

use super::{compress_image, ImageDirectory, ObjectStorage};
use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Public URL layout of a bucket: `https://<bucket>.s3.<region>.amazonaws.com/<key>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketUrl {
    base: String,
}

impl BucketUrl {
    pub fn new(bucket: &str, region: &str) -> Self {
        Self {
            base: format!("https://{}.s3.{}.amazonaws.com", bucket, region),
        }
    }

    /// URL of the object stored under `key`
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base, key)
    }

    /// Object key of a URL inside this bucket
    pub fn key_of<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.base.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .map(|key| key.split(['?', '#']).next().unwrap_or(key))
            .filter(|key| !key.is_empty())
    }
}

/// Image storage backed by an S3 bucket
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    urls: BucketUrl,
}

impl std::fmt::Debug for S3Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Storage")
            .field("bucket", &self.bucket)
            .finish()
    }
}

impl S3Storage {
    /// Build a client from the default AWS credential chain.
    pub async fn new(config: &Config) -> Self {
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()))
            .load()
            .await;

        tracing::info!(
            bucket = %config.s3_bucket,
            region = %config.aws_region,
            "Initializing S3 storage"
        );

        Self {
            client: Client::new(&shared),
            bucket: config.s3_bucket.clone(),
            urls: BucketUrl::new(&config.s3_bucket, &config.aws_region),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn upload(
        &self,
        data: Bytes,
        mime_type: &str,
        directory: ImageDirectory,
    ) -> AppResult<String> {
        if !mime_type.starts_with("image/") {
            return Err(AppError::validation("Only image files are allowed"));
        }

        let original_size = data.len();
        let compressed = tokio::task::spawn_blocking(move || compress_image(&data))
            .await
            .map_err(|e| AppError::internal(format!("Image compression task failed: {e}")))??;

        let key = format!("{}/{}.jpeg", directory.as_str(), Uuid::new_v4());
        let acl = if directory.is_public() {
            ObjectCannedAcl::PublicRead
        } else {
            ObjectCannedAcl::Private
        };
        let compressed_size = compressed.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(compressed))
            .content_type("image/jpeg")
            .acl(acl)
            .send()
            .await
            .map_err(|e| {
                AppError::storage(format!("S3 upload failed: {}", DisplayErrorContext(&e)))
            })?;

        tracing::info!(
            key = %key,
            original_size,
            compressed_size,
            "Image uploaded"
        );

        Ok(self.urls.object_url(&key))
    }

    async fn delete(&self, url: &str) -> AppResult<()> {
        let key = self
            .urls
            .key_of(url)
            .ok_or_else(|| AppError::storage(format!("URL is not in bucket {}", self.bucket)))?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::storage(format!("S3 delete failed: {}", DisplayErrorContext(&e)))
            })?;

        tracing::info!(key = %key, "Image deleted");
        Ok(())
    }

    fn owns(&self, url: &str) -> bool {
        self.urls.key_of(url).is_some()
    }
}
