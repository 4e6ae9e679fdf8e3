//! Blob storage abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::DomainError;

/// A stored blob: where it lives and how the public reaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Storage locator, e.g. `games/{id}/photos/001_original.jpg`.
    pub path: String,
    /// Public reference.
    pub public_url: String,
}

/// Object storage for uploaded and generated images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `path` and returns its public reference.
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredBlob, DomainError>;

    /// Reads a blob back.
    async fn get(&self, path: &str) -> Result<Vec<u8>, DomainError>;

    /// Returns a reference to `path` that stops being valid after `ttl`.
    fn signed_url(
        &self,
        path: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, DomainError>;

    /// Checks the `expires`/`signature` pair of a reference produced by
    /// [`BlobStore::signed_url`].
    ///
    /// Returns `DomainError::Validation` when the signature does not match or
    /// the reference has expired.
    fn verify_signed_url(
        &self,
        path: &str,
        expires: i64,
        signature: &str,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError>;
}

/// File extension for an image mime type.
#[must_use]
pub fn extension_for(mime_type: &str) -> &'static str {
    if mime_type.contains("png") {
        "png"
    } else if mime_type.contains("webp") {
        "webp"
    } else {
        "jpg"
    }
}

/// Image mime type for a stored path, from its extension.
#[must_use]
pub fn mime_for_path(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

/// Storage locator of a game photo: `games/{game}/photos/{seq:03}_{suffix}.{ext}`.
#[must_use]
pub fn photo_path(game_id: uuid::Uuid, sequence: u32, suffix: &str, mime_type: &str) -> String {
    format!(
        "games/{game_id}/photos/{sequence:03}_{suffix}.{}",
        extension_for(mime_type)
    )
}
