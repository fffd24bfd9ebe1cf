//! MinIO/S3-compatible storage client
//!
//! Uploads spot images and resolves the URLs stored on a spot record.
//!
//! Uses rust-s3 crate for lightweight S3 operations.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::{debug, info};

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};

/// Object storage for uploaded images
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` under `key`, returning the key
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String>;

    /// Resolve a URL from which the object can be downloaded
    async fn download_url(&self, key: &str) -> Result<String>;
}

/// MinIO/S3-compatible storage client
pub struct MinIOClient {
    bucket: Box<Bucket>,
    public_endpoint: String,
    public_urls: bool,
    presigned_url_expiry_secs: u32,
}

impl MinIOClient {
    /// Create a new storage client from configuration.
    ///
    /// No network call is made; the bucket is expected to exist.
    pub fn new(config: StorageConfig) -> Result<Self> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Config(format!("Failed to create storage credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| AppError::Config(format!("Failed to create storage bucket: {}", e)))?;

        // Use path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        info!(
            "Storage client initialized for endpoint: {}, bucket: {}, public_urls: {}",
            config.endpoint,
            bucket.name(),
            config.public_urls
        );

        Ok(Self {
            bucket,
            public_endpoint: config.public_endpoint,
            public_urls: config.public_urls,
            presigned_url_expiry_secs: config.presigned_url_expiry_secs,
        })
    }

    /// Direct URL of an object on the public endpoint
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), key)
    }

    async fn presigned_url(&self, key: &str) -> Result<String> {
        self.bucket
            .presign_get(key, self.presigned_url_expiry_secs, None)
            .await
            .map_err(|e| {
                AppError::Upload(format!(
                    "Failed to generate presigned URL for '{}': {}",
                    key, e
                ))
            })
    }
}

#[async_trait]
impl ObjectStorage for MinIOClient {
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String> {
        let size = data.len();
        let response = self
            .bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| AppError::Upload(format!("Failed to upload file '{}': {}", key, e)))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(AppError::Upload(format!(
                "Failed to upload file '{}': HTTP {}",
                key, status
            )));
        }

        debug!(
            "Uploaded file '{}' ({} bytes) to bucket '{}'",
            key,
            size,
            self.bucket.name()
        );
        Ok(key.to_string())
    }

    async fn download_url(&self, key: &str) -> Result<String> {
        if self.public_urls {
            Ok(self.public_url(key))
        } else {
            self.presigned_url(key).await
        }
    }
}
