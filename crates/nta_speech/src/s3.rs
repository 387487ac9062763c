use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::info;

use nta_core::{AudioStore, Error, Result};

/// Public URL of an object in a bucket with public read access.
pub fn public_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
}

#[derive(Debug, Clone)]
pub struct S3AudioStore {
    client: Client,
    bucket: String,
    region: String,
}

impl S3AudioStore {
    pub fn new(client: Client, bucket: String, region: String) -> Self {
        Self { client, bucket, region }
    }
}

#[async_trait]
impl AudioStore for S3AudioStore {
    async fn upload(&self, path: &Path, key: &str, content_type: &str) -> Result<String> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| Error::Storage(format!("Failed to read {}: {}", path.display(), e)))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Storage(DisplayErrorContext(&e).to_string()))?;

        let url = public_url(&self.bucket, &self.region, key);
        info!("☁️ Uploaded {} to {}", path.display(), url);
        Ok(url)
    }
}
