//! In-memory `BlobStore`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use hauntcam_core::blob::{BlobStore, StoredBlob};
use hauntcam_core::error::DomainError;

/// Public reference prefix used by [`InMemoryBlobStore`].
pub const TEST_BLOB_BASE_URL: &str = "https://blobs.test";

/// The only signature [`InMemoryBlobStore`] issues and accepts.
pub const TEST_SIGNATURE: &str = "test-signature";

/// A blob store that keeps everything in a map.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl InMemoryBlobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Content type stored for `path`, if present.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn content_type(&self, path: &str) -> Option<String> {
        self.blobs
            .lock()
            .unwrap()
            .get(path)
            .map(|(_, content_type)| content_type.clone())
    }

    /// Every stored path, sorted.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.blobs.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredBlob, DomainError> {
        self.blobs
            .lock()
            .unwrap()
            .insert(path.to_owned(), (bytes, content_type.to_owned()));
        Ok(StoredBlob {
            path: path.to_owned(),
            public_url: format!("{TEST_BLOB_BASE_URL}/{path}"),
        })
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, DomainError> {
        self.blobs
            .lock()
            .unwrap()
            .get(path)
            .map(|(bytes, _)| bytes.clone())
            .ok_or_else(|| DomainError::not_found("blob", path))
    }

    fn signed_url(
        &self,
        path: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, DomainError> {
        let expires = (now + ttl).timestamp();
        Ok(format!(
            "{TEST_BLOB_BASE_URL}/{path}?expires={expires}&signature={TEST_SIGNATURE}"
        ))
    }

    fn verify_signed_url(
        &self,
        path: &str,
        expires: i64,
        signature: &str,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if signature != TEST_SIGNATURE {
            return Err(DomainError::Validation(format!("bad signature for {path}")));
        }
        if expires < now.timestamp() {
            return Err(DomainError::Validation(format!("reference to {path} expired")));
        }
        Ok(())
    }
}
