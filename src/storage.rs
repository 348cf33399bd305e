use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::presigning::PresigningConfig;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::models::SheetKind;

/// Lifetime of every presigned URL handed out by the Excel exchange.
const PRESIGN_TTL: Duration = Duration::from_secs(600);

/// StorageService
///
/// Object storage used by the Excel exchange. Clients move spreadsheet
/// bytes directly to and from the bucket through presigned URLs; the API
/// only keeps the metadata.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Creates the configured bucket if missing. Only called in `Env::Local`.
    async fn ensure_bucket_exists(&self);

    /// Time-limited PUT URL constrained to `content_type`.
    async fn presigned_upload_url(&self, key: &str, content_type: &str) -> Result<String, String>;

    /// Time-limited GET URL for an existing object.
    async fn presigned_download_url(&self, key: &str) -> Result<String, String>;
}

/// S3StorageClient
///
/// `StorageService` over any S3-compatible endpoint (MinIO locally).
/// Path-style addressing is forced for MinIO compatibility.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    bucket_name: String,
}

impl S3StorageClient {
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        Self {
            client: s3::Client::from_conf(config),
            bucket_name: bucket.to_string(),
        }
    }

    fn presigning() -> Result<PresigningConfig, String> {
        PresigningConfig::expires_in(PRESIGN_TTL).map_err(|e| e.to_string())
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    async fn ensure_bucket_exists(&self) {
        // CreateBucket fails harmlessly when the bucket already exists.
        if let Err(e) = self.client.create_bucket().bucket(&self.bucket_name).send().await {
            tracing::debug!("create_bucket: {:?}", e);
        }
    }

    async fn presigned_upload_url(&self, key: &str, content_type: &str) -> Result<String, String> {
        let presigned_req = self
            .client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .presigned(Self::presigning()?)
            .await
            .map_err(|e| e.to_string())?;

        Ok(presigned_req.uri().to_string())
    }

    async fn presigned_download_url(&self, key: &str) -> Result<String, String> {
        let presigned_req = self
            .client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .presigned(Self::presigning()?)
            .await
            .map_err(|e| e.to_string())?;

        Ok(presigned_req.uri().to_string())
    }
}

/// sanitize_key
///
/// Drops empty, `.` and `..` segments from an object key.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Builds the object key for a new sheet: `sheets/<kind>/<uuid>.<ext>`.
/// The client-supplied file name never reaches the key.
pub fn sheet_object_key(kind: SheetKind, extension: &str) -> String {
    sanitize_key(&format!("sheets/{}/{}.{}", kind.as_str(), Uuid::new_v4(), extension))
}

/// MIME type the upload URL is constrained to.
pub fn sheet_content_type(extension: &str) -> &'static str {
    match extension {
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xls" => "application/vnd.ms-excel",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}

/// MockStorageService
///
/// Deterministic in-process `StorageService` for tests and bucket-less local runs.
#[derive(Clone, Default)]
pub struct MockStorageService {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {}

    async fn presigned_upload_url(&self, key: &str, _content_type: &str) -> Result<String, String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }
        Ok(format!(
            "http://localhost:9000/mock-bucket/{}?X-Amz-Signature=upload",
            sanitize_key(key)
        ))
    }

    async fn presigned_download_url(&self, key: &str) -> Result<String, String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }
        Ok(format!(
            "http://localhost:9000/mock-bucket/{}?X-Amz-Signature=download",
            sanitize_key(key)
        ))
    }
}

pub type StorageState = Arc<dyn StorageService>;
