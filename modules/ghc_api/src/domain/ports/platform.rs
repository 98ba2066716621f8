use async_trait::async_trait;

use crate::contract::model::ObjectTags;
use crate::domain::error::DomainError;
use crate::domain::events::{AuditRecord, Event};
use crate::domain::session::Session;

/// Object storage used to hand out download links.
#[async_trait]
pub trait FileStorer: Send + Sync {
    async fn presigned_url(
        &self,
        key: &str,
        content_type: &str,
        filename: &str,
    ) -> Result<String, DomainError>;

    async fn tags(&self, key: &str) -> Result<ObjectTags, DomainError>;
}

#[async_trait]
pub trait AuditCapture: Send + Sync {
    async fn capture(&self, record: &AuditRecord) -> Result<(), DomainError>;
}

#[async_trait]
pub trait EventTrigger: Send + Sync {
    async fn trigger(&self, event: &Event) -> Result<(), DomainError>;
}

/// Maps a bearer token to a session. `None` means unauthenticated.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Option<Session>;
}
