pub mod storage_handlers;

pub use storage_handlers::upload_attachment;

use crate::chat::attachment::Attachment;
use crate::error::{AppError, Result};
use crate::state::Config;
use uuid::Uuid;

/// Single size ceiling for attachments, matching the bucket-level limit.
pub const MAX_ATTACHMENT_BYTES: i64 = 50 * 1024 * 1024;

/// Request-body cap for the upload route. Axum's default is far below the
/// attachment ceiling, so the route must raise it; a little slack covers
/// framing overhead so a file at exactly the ceiling still reaches
/// `validate_upload`.
pub fn upload_body_limit() -> usize {
    MAX_ATTACHMENT_BYTES as usize + 64 * 1024
}

/// MIME types the bucket accepts. Image types are allowed wholesale.
const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/zip",
    "text/plain",
    "audio/mpeg",
    "video/mp4",
];

pub fn mime_allowed(mime_type: &str) -> bool {
    mime_type.starts_with("image/") || ALLOWED_MIME_TYPES.contains(&mime_type)
}

/// Pre-upload validation. Failing here aborts the attach before any bytes
/// leave the process.
pub fn validate_upload(filename: &str, mime_type: &str, size: i64) -> Result<()> {
    if filename.is_empty() {
        return Err(AppError::Validation("File name is required".into()));
    }
    if size == 0 {
        return Err(AppError::Validation("File is empty".into()));
    }
    if size > MAX_ATTACHMENT_BYTES {
        return Err(AppError::Validation(format!(
            "File exceeds the {} MB attachment limit",
            MAX_ATTACHMENT_BYTES / (1024 * 1024)
        )));
    }
    if !mime_allowed(mime_type) {
        return Err(AppError::Validation(format!(
            "File type {} is not allowed",
            mime_type
        )));
    }
    Ok(())
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Collision-resistant storage key scoped under the uploader's identity.
pub fn object_key(user_id: Uuid, filename: &str) -> String {
    format!(
        "chat_files/{}/{}_{}",
        user_id,
        Uuid::new_v4(),
        sanitize_filename(filename)
    )
}

/// Thin HTTP client for the managed object store.
#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    api_key: String,
}

impl StorageClient {
    pub fn new(base_url: String, bucket: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            bucket,
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.storage_base_url.clone(),
            config.storage_bucket.clone(),
            config.storage_api_key.clone(),
        )
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/object/{}/{}", self.base_url, self.bucket, key)
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, self.bucket, key)
    }

    /// Validates, uploads and returns the durable descriptor. Any failure
    /// surfaces as an error and nothing is attached.
    pub async fn upload(
        &self,
        user_id: Uuid,
        filename: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Attachment> {
        let size = bytes.len() as i64;
        validate_upload(filename, mime_type, size)?;

        let key = object_key(user_id, filename);

        let response = self
            .http
            .put(self.object_url(&key))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Storage(format!(
                "Upload rejected with status {}",
                response.status()
            )));
        }

        Ok(Attachment {
            id: Uuid::new_v4().to_string(),
            name: filename.to_string(),
            mime_type: mime_type.to_string(),
            url: self.public_url(&key),
            size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_ceiling() {
        assert!(validate_upload("a.png", "image/png", MAX_ATTACHMENT_BYTES).is_ok());
        assert!(validate_upload("a.png", "image/png", MAX_ATTACHMENT_BYTES + 1).is_err());
        assert!(validate_upload("a.png", "image/png", 0).is_err());
    }

    #[test]
    fn test_body_limit_admits_a_ceiling_sized_file() {
        // The route-level body cap must not undercut the documented
        // attachment ceiling.
        assert!(upload_body_limit() > MAX_ATTACHMENT_BYTES as usize);
    }

    #[test]
    fn test_mime_allow_list() {
        assert!(mime_allowed("image/webp"));
        assert!(mime_allowed("application/pdf"));
        assert!(!mime_allowed("application/x-msdownload"));
        assert!(validate_upload("a.exe", "application/x-msdownload", 10).is_err());
    }

    #[test]
    fn test_object_key_is_user_scoped_and_unique() {
        let user = Uuid::new_v4();
        let key1 = object_key(user, "my receipt (1).pdf");
        let key2 = object_key(user, "my receipt (1).pdf");

        assert!(key1.starts_with(&format!("chat_files/{}/", user)));
        assert_ne!(key1, key2);
        assert!(key1.ends_with("my_receipt__1_.pdf"));
    }
}
