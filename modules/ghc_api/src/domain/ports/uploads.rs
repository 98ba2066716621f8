use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{Document, Upload};
use crate::domain::error::DomainError;

#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_document(&self, document_id: Uuid) -> Result<Document, DomainError>;
}

#[async_trait]
pub trait UploadUpdater: Send + Sync {
    async fn update_rotation(&self, upload_id: Uuid, rotation: i64) -> Result<Upload, DomainError>;
}

#[async_trait]
pub trait UploadDeleter: Send + Sync {
    async fn delete_upload(&self, upload_id: Uuid) -> Result<(), DomainError>;
}
