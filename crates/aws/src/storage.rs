use crate::error::RemoteOperationError;
use crate::format_timestamp;
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types as s3;
use aws_sdk_s3::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// One row of a `list_buckets` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub name: String,
    pub creation_time: String,
}

/// Storage subsystem operations. One remote call per method; confirmation
/// strings are the tool layer's concern.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, RemoteOperationError>;

    /// Streams a local file into `s3://bucket/key`. The local file must
    /// exist; no existence check is made on the bucket.
    async fn upload_file(
        &self,
        local_path: &Path,
        bucket: &str,
        key: &str,
    ) -> Result<(), RemoteOperationError>;

    /// Fetches `s3://bucket/key` and writes it to `local_path`.
    async fn download_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
    ) -> Result<(), RemoteOperationError>;
}

/// S3-backed [`StorageClient`].
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(conf: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(conf))
    }
}

#[async_trait]
impl StorageClient for S3Storage {
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, RemoteOperationError> {
        debug!("listing S3 buckets");
        let response = self.client.list_buckets().send().await.map_err(|e| {
            RemoteOperationError::new("s3 list_buckets", format!("{}", DisplayErrorContext(&e)))
        })?;

        Ok(response.buckets().iter().map(convert_bucket).collect())
    }

    async fn upload_file(
        &self,
        local_path: &Path,
        bucket: &str,
        key: &str,
    ) -> Result<(), RemoteOperationError> {
        debug!(path = %local_path.display(), bucket, key, "uploading file to S3");
        let body = ByteStream::from_path(local_path).await.map_err(|e| {
            RemoteOperationError::with_resource(
                "s3 upload_file",
                local_path.display().to_string(),
                e.to_string(),
            )
        })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                RemoteOperationError::with_resource(
                    "s3 upload_file",
                    format!("s3://{}/{}", bucket, key),
                    format!("{}", DisplayErrorContext(&e)),
                )
            })?;
        Ok(())
    }

    async fn download_file(
        &self,
        bucket: &str,
        key: &str,
        local_path: &Path,
    ) -> Result<(), RemoteOperationError> {
        debug!(bucket, key, path = %local_path.display(), "downloading file from S3");
        let uri = format!("s3://{}/{}", bucket, key);

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                RemoteOperationError::with_resource(
                    "s3 download_file",
                    uri.clone(),
                    format!("{}", DisplayErrorContext(&e)),
                )
            })?;

        let data = response.body.collect().await.map_err(|e| {
            RemoteOperationError::with_resource("s3 download_file", uri.clone(), e.to_string())
        })?;

        tokio::fs::write(local_path, data.into_bytes())
            .await
            .map_err(|e| {
                RemoteOperationError::with_resource(
                    "s3 download_file",
                    local_path.display().to_string(),
                    e.to_string(),
                )
            })?;
        Ok(())
    }
}

fn convert_bucket(bucket: &s3::Bucket) -> BucketSummary {
    BucketSummary {
        name: bucket.name().unwrap_or_default().to_string(),
        creation_time: bucket
            .creation_date()
            .map(format_timestamp)
            .unwrap_or_default(),
    }
}
