use std::collections::HashMap;

use anyhow::ensure;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::contract::model::ObjectTags;
use crate::domain::error::DomainError;
use crate::domain::ports::FileStorer;

/// Presigns URLs against a local storage endpoint.
///
/// Expiry is rounded up to a `ttl` bucket boundary, so the same object yields
/// the same URL for the whole bucket and never less than `ttl` of validity.
pub struct LocalFileStorer {
    base_url: String,
    secret: String,
    ttl_seconds: i64,
    tags: RwLock<HashMap<String, ObjectTags>>,
}

impl LocalFileStorer {
    pub fn new(
        base_url: impl Into<String>,
        secret: impl Into<String>,
        ttl_seconds: i64,
    ) -> anyhow::Result<Self> {
        ensure!(ttl_seconds > 0, "presign ttl must be positive, got {ttl_seconds}");
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret: secret.into(),
            ttl_seconds,
            tags: RwLock::new(HashMap::new()),
        })
    }

    pub fn set_tags(&self, key: impl Into<String>, tags: ObjectTags) {
        self.tags.write().insert(key.into(), tags);
    }

    fn expires_at(&self, now: i64) -> i64 {
        (now / self.ttl_seconds + 2) * self.ttl_seconds
    }

    fn sign(&self, key: &str, content_type: &str, filename: &str, expires: i64) -> String {
        let mut h = Sha256::new();
        for part in [self.secret.as_str(), key, content_type, filename] {
            h.update(part.as_bytes());
            h.update(b"\n");
        }
        h.update(expires.to_string().as_bytes());
        hex::encode(h.finalize())
    }

    /// True when `signature` is valid for the given object and has not expired.
    pub fn verify(
        &self,
        key: &str,
        content_type: &str,
        filename: &str,
        expires: i64,
        signature: &str,
    ) -> bool {
        expires > Utc::now().timestamp()
            && self.sign(key, content_type, filename, expires) == signature
    }
}

fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|seg| urlencoding::encode(seg).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl FileStorer for LocalFileStorer {
    #[instrument(name = "ghc_api.storage.presigned_url", skip(self))]
    async fn presigned_url(
        &self,
        key: &str,
        content_type: &str,
        filename: &str,
    ) -> Result<String, DomainError> {
        if key.is_empty() {
            return Err(DomainError::unexpected("storage key is empty"));
        }
        let expires = self.expires_at(Utc::now().timestamp());
        let signature = self.sign(key, content_type, filename, expires);
        Ok(format!(
            "{}/{}?contentType={}&filename={}&expires={}&signature={}",
            self.base_url,
            encode_key(key),
            urlencoding::encode(content_type),
            urlencoding::encode(filename),
            expires,
            signature
        ))
    }

    async fn tags(&self, key: &str) -> Result<ObjectTags, DomainError> {
        Ok(self.tags.read().get(key).cloned().unwrap_or_default())
    }
}
