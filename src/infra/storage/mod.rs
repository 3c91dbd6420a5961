//! Object storage for uploaded images.

mod compression;
mod s3;

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::AppResult;

pub use compression::compress_image;
pub use s3::{BucketUrl, S3Storage};

#[cfg(test)]
use mockall::automock;

/// Top-level folder an object is stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageDirectory {
    /// Tool photos, publicly readable
    Tools,
    /// Profile pictures, private
    Profiles,
}

impl ImageDirectory {
    pub const fn as_str(self) -> &'static str {
        match self {
            ImageDirectory::Tools => "tools",
            ImageDirectory::Profiles => "profiles",
        }
    }

    pub const fn is_public(self) -> bool {
        matches!(self, ImageDirectory::Tools)
    }
}

/// Object storage trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Re-encode and store an image, returning its public URL
    async fn upload(
        &self,
        data: Bytes,
        mime_type: &str,
        directory: ImageDirectory,
    ) -> AppResult<String>;

    /// Remove the object a URL points to
    async fn delete(&self, url: &str) -> AppResult<()>;

    /// Whether `url` points into this storage
    fn owns(&self, url: &str) -> bool;
}
