//! CV object storage — original documents live in S3 (MinIO locally).

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::errors::AppError;

#[async_trait]
pub trait CvStorage: Send + Sync {
    async fn put_cv(&self, key: &str, document: Bytes, content_type: &str)
        -> Result<(), AppError>;

    /// Time-bounded download URL for a stored CV.
    async fn signed_url(&self, key: &str, expires_in: Duration) -> Result<String, AppError>;
}

pub struct S3CvStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3CvStorage {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl CvStorage for S3CvStorage {
    async fn put_cv(
        &self,
        key: &str,
        document: Bytes,
        content_type: &str,
    ) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(document))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

        info!("Uploaded CV to s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn signed_url(&self, key: &str, expires_in: Duration) -> Result<String, AppError> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| AppError::Storage(format!("Invalid presign duration: {e}")))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| AppError::Storage(format!("S3 presign failed: {e}")))?;

        Ok(request.uri().to_string())
    }
}

/// Builds the storage key `cvs/<unix-millis>-<file name>`.
/// Path separators and unusual characters in the file name are replaced by `_`.
pub fn cv_object_key(file_name: &str, now: DateTime<Utc>) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = if sanitized.trim_matches(['.', '_']).is_empty() {
        "cv.pdf".to_string()
    } else {
        sanitized
    };
    format!("cvs/{}-{}", now.timestamp_millis(), sanitized)
}

/// Content type stored alongside the document, derived from its extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".txt") || lower.ends_with(".md") {
        "text/plain"
    } else {
        "application/pdf"
    }
}
