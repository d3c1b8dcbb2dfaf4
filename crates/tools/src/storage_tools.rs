use crate::{parse_args, render_json, DuplicateNameError, Tool, ToolError, Toolset};
use async_trait::async_trait;
use cloudclaw_aws::StorageClient;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Builds the storage toolset. Registration order is list, upload, download.
pub fn toolset(client: Arc<dyn StorageClient>) -> Result<Toolset, DuplicateNameError> {
    let mut set = Toolset::new("s3");
    set.register(Arc::new(S3ListBucketsTool::new(client.clone())))?;
    set.register(Arc::new(S3UploadFileTool::new(client.clone())))?;
    set.register(Arc::new(S3DownloadFileTool::new(client)))?;
    Ok(set)
}

pub struct S3ListBucketsTool {
    client: Arc<dyn StorageClient>,
}

impl S3ListBucketsTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for S3ListBucketsTool {
    fn name(&self) -> &str {
        "s3_list_buckets"
    }

    fn description(&self) -> &str {
        "List all S3 buckets in your AWS account"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn run(&self, _args: Value) -> Result<String, ToolError> {
        let buckets = self.client.list_buckets().await?;
        info!(count = buckets.len(), "listed S3 buckets");
        render_json(&buckets)
    }
}

pub struct S3UploadFileTool {
    client: Arc<dyn StorageClient>,
}

impl S3UploadFileTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct UploadFileArgs {
    file_path: String,
    bucket_name: String,
    #[serde(default)]
    key: Option<String>,
}

#[async_trait]
impl Tool for S3UploadFileTool {
    fn name(&self) -> &str {
        "s3_upload_file"
    }

    fn description(&self) -> &str {
        "Upload a file to an S3 bucket"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Local path to the file to upload"
                },
                "bucket_name": {
                    "type": "string",
                    "description": "Name of the S3 bucket"
                },
                "key": {
                    "type": "string",
                    "description": "S3 key (path) for the file. If not provided, uses filename"
                }
            },
            "required": ["file_path", "bucket_name"]
        })
    }

    async fn run(&self, args: Value) -> Result<String, ToolError> {
        let args: UploadFileArgs = parse_args(args)?;
        let key = match args.key {
            Some(key) => key,
            None => Path::new(&args.file_path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    ToolError::InvalidArgs(
                        "file_path has no file name to use as the key".to_string(),
                    )
                })?,
        };

        info!(file = %args.file_path, bucket = %args.bucket_name, key = %key, "uploading to S3");
        self.client
            .upload_file(Path::new(&args.file_path), &args.bucket_name, &key)
            .await?;
        Ok(format!(
            "Successfully uploaded {} to s3://{}/{}",
            args.file_path, args.bucket_name, key
        ))
    }
}

pub struct S3DownloadFileTool {
    client: Arc<dyn StorageClient>,
}

impl S3DownloadFileTool {
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self { client }
    }
}

#[derive(Deserialize)]
struct DownloadFileArgs {
    bucket_name: String,
    key: String,
    local_path: String,
}

#[async_trait]
impl Tool for S3DownloadFileTool {
    fn name(&self) -> &str {
        "s3_download_file"
    }

    fn description(&self) -> &str {
        "Download a file from an S3 bucket"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "bucket_name": {
                    "type": "string",
                    "description": "Name of the S3 bucket"
                },
                "key": {
                    "type": "string",
                    "description": "S3 key (path) of the file to download"
                },
                "local_path": {
                    "type": "string",
                    "description": "Local path where to save the downloaded file"
                }
            },
            "required": ["bucket_name", "key", "local_path"]
        })
    }

    async fn run(&self, args: Value) -> Result<String, ToolError> {
        let args: DownloadFileArgs = parse_args(args)?;
        info!(bucket = %args.bucket_name, key = %args.key, "downloading from S3");
        self.client
            .download_file(&args.bucket_name, &args.key, Path::new(&args.local_path))
            .await?;
        Ok(format!(
            "Successfully downloaded s3://{}/{} to {}",
            args.bucket_name, args.key, args.local_path
        ))
    }
}
