use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{Document, Upload, UploadType};
use crate::domain::error::DomainError;
use crate::domain::ports::FileStorer;

/// Tag the virus scanner writes on stored objects.
pub const AV_STATUS_TAG: &str = "av-status";
pub const AV_STATUS_PROCESSING: &str = "PROCESSING";

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadDto {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub upload_type: UploadType,
    pub bytes: i64,
    pub rotation: Option<i64>,
    pub url: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UploadDto {
    pub async fn build(u: &Upload, storer: &dyn FileStorer) -> Result<Self, DomainError> {
        let url = storer
            .presigned_url(&u.storage_key, &u.content_type, &u.filename)
            .await
            .map_err(|e| DomainError::unexpected_from("could not presign upload URL", e))?;
        let status = storer
            .tags(&u.storage_key)
            .await
            .ok()
            .and_then(|tags| tags.get(AV_STATUS_TAG).cloned())
            .unwrap_or_else(|| AV_STATUS_PROCESSING.to_string());
        Ok(Self {
            id: u.id,
            filename: u.filename.clone(),
            content_type: u.content_type.clone(),
            upload_type: u.upload_type,
            bytes: u.bytes,
            rotation: u.rotation,
            url,
            status,
            created_at: u.created_at,
            updated_at: u.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDto {
    pub id: Uuid,
    pub service_member_id: Uuid,
    pub uploads: Vec<UploadDto>,
}

impl DocumentDto {
    pub async fn build(d: &Document, storer: &dyn FileStorer) -> Result<Self, DomainError> {
        let mut uploads = Vec::with_capacity(d.uploads.len());
        for u in &d.uploads {
            uploads.push(UploadDto::build(u, storer).await?);
        }
        Ok(Self {
            id: d.id,
            service_member_id: d.service_member_id,
            uploads,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUploadReq {
    pub rotation: Option<i64>,
}

impl UpdateUploadReq {
    pub fn rotation(&self) -> Result<i64, DomainError> {
        match self.rotation {
            Some(r) if (0..=3).contains(&r) => Ok(r),
            Some(_) => Err(DomainError::invalid_field("rotation", "must be between 0 and 3")),
            None => Err(DomainError::invalid_field("rotation", "is required")),
        }
    }
}
