use async_trait::async_trait;
use base64::Engine as _;
use log::{error, info, warn};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;

use crate::models::UploadResult;

pub const DEFAULT_FOLDER: &str = "hero-sliders";
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const ALLOWED_MIME: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp", "image/svg+xml"];

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("not_found")]
    NotFound,
    #[error("other: {0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub secure_url: String,
    pub public_id: String,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, folder: &str, bytes: &[u8]) -> Result<StoredImage, ImageStoreError>;
    async fn delete(&self, public_id: &str) -> Result<(), ImageStoreError>;
}

/// `{folder}/{sha256 of bytes}`, so the same image lands on the same key.
pub fn public_id_for(folder: &str, bytes: &[u8]) -> String {
    let hash = format!("{:x}", Sha256::digest(bytes));
    format!("{}/{hash}", folder.trim_matches('/'))
}

pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if let Some(kind) = infer::get(bytes) {
        return Some(kind.mime_type());
    }
    let head = std::str::from_utf8(&bytes[..bytes.len().min(256)]).ok()?;
    let head = head.trim_start();
    (head.starts_with("<svg") || head.starts_with("<?xml")).then_some("image/svg+xml")
}

/// Payload bytes of a base64 string or a `data:<mime>;base64,` URL.
pub fn decode_inline(data: &str) -> Result<Vec<u8>, String> {
    let encoded = match data.strip_prefix("data:") {
        Some(rest) => match rest.split_once(',') {
            Some((meta, payload)) if meta.ends_with(";base64") => payload,
            _ => return Err("unsupported data URL".into()),
        },
        None => data,
    };
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| format!("invalid base64: {e}"))
}

/// Uploads `bytes`; every failure is reported inside the result.
pub async fn upload_image(store: &dyn ImageStore, bytes: &[u8], folder: Option<&str>) -> UploadResult {
    if bytes.is_empty() {
        return UploadResult::failed("empty upload");
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return UploadResult::failed("file too large");
    }
    match sniff_mime(bytes) {
        Some(mime) if ALLOWED_MIME.contains(&mime) => {}
        Some(mime) => return UploadResult::failed(format!("unsupported type {mime}")),
        None => return UploadResult::failed("unrecognized file type"),
    }
    let folder = folder.map(str::trim).filter(|f| !f.is_empty()).unwrap_or(DEFAULT_FOLDER);
    match store.upload(folder, bytes).await {
        Ok(stored) => UploadResult::ok(stored.secure_url, stored.public_id),
        Err(e) => {
            error!("image upload failed: {e}");
            UploadResult::failed(e.to_string())
        }
    }
}

pub async fn upload_inline(store: &dyn ImageStore, data: &str, folder: Option<&str>) -> UploadResult {
    match decode_inline(data) {
        Ok(bytes) => upload_image(store, &bytes, folder).await,
        Err(e) => UploadResult::failed(e),
    }
}

// S3 / MinIO
pub struct S3ImageStore {
    bucket: String,
    client: aws_sdk_s3::Client,
    public_url: String,
}

impl S3ImageStore {
    pub async fn new() -> anyhow::Result<Self> {
        use aws_credential_types::provider::SharedCredentialsProvider;
        use aws_credential_types::Credentials;

        let bucket = std::env::var("S3_BUCKET").unwrap_or_else(|_| "estate-images".into());
        let endpoint = std::env::var("S3_ENDPOINT")
            .map_err(|_| anyhow::anyhow!("S3_ENDPOINT must be set (MinIO / S3 endpoint)"))?;
        let region = std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into());
        let access = std::env::var("S3_ACCESS_KEY").unwrap_or_default();
        let secret = std::env::var("S3_SECRET_KEY").unwrap_or_default();
        let public_url = std::env::var("S3_PUBLIC_URL")
            .unwrap_or_else(|_| format!("{}/{bucket}", endpoint.trim_end_matches('/')));

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region))
            .endpoint_url(endpoint);
        if !access.is_empty() && !secret.is_empty() {
            let creds = Credentials::new(access, secret, None, None, "static");
            loader = loader.credentials_provider(SharedCredentialsProvider::new(creds));
        }
        let conf = loader.load().await;
        // MinIO without wildcard DNS needs path-style
        let s3_conf = aws_sdk_s3::config::Builder::from(&conf).force_path_style(true).build();
        let client = aws_sdk_s3::Client::from_conf(s3_conf);
        info!("initialized S3 client for bucket '{bucket}'");

        if let Err(e) = client.head_bucket().bucket(&bucket).send().await {
            warn!("head_bucket failed for '{bucket}' (will attempt create): {e:?}");
            let max_attempts = 8u32;
            let mut attempt = 0u32;
            loop {
                attempt += 1;
                match client.create_bucket().bucket(&bucket).send().await {
                    Ok(_) => {
                        info!("created bucket '{bucket}' (attempt {attempt})");
                        break;
                    }
                    Err(e2) if attempt >= max_attempts => {
                        error!("create_bucket failed for '{bucket}' after {attempt} attempts: {e2:?}");
                        return Err(anyhow::anyhow!("failed to ensure bucket '{bucket}': {e2}"));
                    }
                    Err(e2) => {
                        let backoff_ms = 200 * u64::from(attempt.pow(2));
                        warn!("create_bucket attempt {attempt} failed for '{bucket}': {e2:?} (retrying in {backoff_ms}ms)");
                        tokio::time::sleep(std::time::Duration::from_millis(backoff_ms)).await;
                    }
                }
            }
        }

        Ok(Self { bucket, client, public_url: public_url.trim_end_matches('/').to_string() })
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn upload(&self, folder: &str, bytes: &[u8]) -> Result<StoredImage, ImageStoreError> {
        use aws_sdk_s3::primitives::ByteStream;
        let public_id = public_id_for(folder, bytes);
        let content_type = sniff_mime(bytes).unwrap_or("application/octet-stream");
        let put = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&public_id)
            .body(ByteStream::from(bytes.to_vec()))
            .content_type(content_type);
        if let Err(e) = put.send().await {
            error!("put_object failed key={public_id} bucket={} err={e:?}", self.bucket);
            let hint = if e.to_string().contains("NoSuchBucket") {
                " (bucket missing or not yet propagated)"
            } else if e.to_string().contains("AccessDenied") {
                " (check S3_ACCESS_KEY/S3_SECRET_KEY permissions)"
            } else {
                ""
            };
            return Err(ImageStoreError::Other(format!("{e}{hint}")));
        }
        Ok(StoredImage { secure_url: format!("{}/{public_id}", self.public_url), public_id })
    }

    async fn delete(&self, public_id: &str) -> Result<(), ImageStoreError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(public_id)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| ImageStoreError::Other(e.to_string()))
    }
}

pub async fn build_image_store() -> anyhow::Result<Arc<dyn ImageStore>> {
    let store = S3ImageStore::new().await?;
    Ok(Arc::new(store))
}
