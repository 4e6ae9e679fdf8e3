//! Local filesystem `BlobStore` with HMAC-SHA256 signed, time-limited references.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use hauntcam_core::blob::{BlobStore, StoredBlob};
use hauntcam_core::error::DomainError;

/// Stores blobs as files under a root directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: String,
    signing_secret: String,
}

impl FsBlobStore {
    /// Creates a store rooted at `root`, publishing references under
    /// `public_base_url`.
    pub fn new(
        root: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
        signing_secret: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_owned(),
            signing_secret: signing_secret.into(),
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, DomainError> {
        let relative = Path::new(path);
        let plain = !path.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !plain {
            return Err(DomainError::Validation(format!("invalid blob path: {path}")));
        }
        Ok(self.root.join(relative))
    }

    fn mac(&self, path: &str, expires: i64) -> Result<Hmac<Sha256>, DomainError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.signing_secret.as_bytes())
            .map_err(|e| DomainError::Infrastructure(format!("invalid signing key: {e}")))?;
        mac.update(path.as_bytes());
        mac.update(&[0]);
        mac.update(expires.to_string().as_bytes());
        Ok(mac)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredBlob, DomainError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::Infrastructure(format!("create {path}: {e}")))?;
        }
        tokio::fs::write(&target, &bytes)
            .await
            .map_err(|e| DomainError::Infrastructure(format!("write {path}: {e}")))?;
        debug!(path, content_type, size = bytes.len(), "blob stored");
        Ok(StoredBlob {
            path: path.to_owned(),
            public_url: format!("{}/{path}", self.public_base_url),
        })
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, DomainError> {
        let target = self.resolve(path)?;
        tokio::fs::read(&target).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => DomainError::not_found("blob", path),
            _ => DomainError::Infrastructure(format!("read {path}: {e}")),
        })
    }

    fn signed_url(
        &self,
        path: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, DomainError> {
        self.resolve(path)?;
        let expires = (now + ttl).timestamp();
        let signature = URL_SAFE_NO_PAD.encode(self.mac(path, expires)?.finalize().into_bytes());
        Ok(format!(
            "{}/{path}?expires={expires}&signature={signature}",
            self.public_base_url
        ))
    }

    fn verify_signed_url(
        &self,
        path: &str,
        expires: i64,
        signature: &str,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let bad_signature = || DomainError::Validation(format!("bad signature for {path}"));
        let tag = URL_SAFE_NO_PAD.decode(signature).map_err(|_| bad_signature())?;
        self.mac(path, expires)?
            .verify_slice(&tag)
            .map_err(|_| bad_signature())?;
        if expires < now.timestamp() {
            return Err(DomainError::Validation(format!("reference to {path} expired")));
        }
        Ok(())
    }
}
