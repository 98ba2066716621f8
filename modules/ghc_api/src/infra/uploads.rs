use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use super::store::{touch, InMemoryStore, Tables};
use crate::contract::model::{Document, Upload};
use crate::domain::error::DomainError;
use crate::domain::ports::{DocumentFetcher, UploadDeleter, UploadUpdater};

pub struct MemUploadService {
    store: Arc<InMemoryStore>,
}

impl MemUploadService {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

/// A live (non-deleted) upload, wherever it is attached.
fn live_upload(t: &mut Tables, upload_id: Uuid) -> Result<&mut Upload, DomainError> {
    t.documents
        .values_mut()
        .flat_map(|d| d.uploads.iter_mut())
        .find(|u| u.id == upload_id && u.deleted_at.is_none())
        .ok_or_else(|| DomainError::not_found("Upload", upload_id))
}

#[async_trait]
impl DocumentFetcher for MemUploadService {
    #[instrument(name = "ghc_api.service.fetch_document", skip(self))]
    async fn fetch_document(&self, document_id: Uuid) -> Result<Document, DomainError> {
        self.store.read().assemble_document(document_id)
    }
}

#[async_trait]
impl UploadUpdater for MemUploadService {
    #[instrument(name = "ghc_api.service.update_rotation", skip(self))]
    async fn update_rotation(
        &self,
        upload_id: Uuid,
        rotation: i64,
    ) -> Result<Upload, DomainError> {
        let mut t = self.store.write();
        let upload = live_upload(&mut t, upload_id)?;
        upload.rotation = Some(rotation);
        upload.updated_at = touch(upload.updated_at);
        Ok(upload.clone())
    }
}

#[async_trait]
impl UploadDeleter for MemUploadService {
    #[instrument(name = "ghc_api.service.delete_upload", skip(self))]
    async fn delete_upload(&self, upload_id: Uuid) -> Result<(), DomainError> {
        let mut t = self.store.write();
        let upload = live_upload(&mut t, upload_id)?;
        let now = Utc::now();
        upload.deleted_at = Some(now);
        upload.updated_at = touch(upload.updated_at);
        Ok(())
    }
}
