use std::sync::Arc;

use axum::{body::Bytes, extract::Path, response::Response, Extension, Json};
use modkit::no_content;

use crate::api::rest::body::parse_json;
use crate::api::rest::context::AppContext;
use crate::api::rest::dto::{DocumentDto, UpdateUploadReq, UploadDto};
use crate::api::rest::guard::{authorize, Capability};
use crate::api::rest::locator::parse_uuid;
use crate::api::rest::state::ApiState;

/// GET /documents/{documentId}
pub async fn get_document(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(document_id): Path<String>,
) -> Response {
    ctx.auditable("GetDocument", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let document_id = parse_uuid("documentID", &document_id)?;

        let document = state.services.document_fetcher.fetch_document(document_id).await?;
        Ok(Json(DocumentDto::build(&document, state.storer.as_ref()).await?))
    })
    .await
}

/// PATCH /uploads/{uploadId}
pub async fn update_upload(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(upload_id): Path<String>,
    body: Bytes,
) -> Response {
    ctx.auditable("UpdateUpload", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let upload_id = parse_uuid("uploadID", &upload_id)?;
        let rotation = parse_json::<UpdateUploadReq>(&body)?.rotation()?;

        let upload = state
            .services
            .upload_updater
            .update_rotation(upload_id, rotation)
            .await?;

        state.emitter.capture(&ctx, "UpdateUpload", "Upload", upload.id).await;
        Ok(Json(UploadDto::build(&upload, state.storer.as_ref()).await?))
    })
    .await
}

/// DELETE /uploads/{uploadId}
pub async fn delete_upload(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(upload_id): Path<String>,
) -> Response {
    ctx.auditable("DeleteUpload", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let upload_id = parse_uuid("uploadID", &upload_id)?;

        state.services.upload_deleter.delete_upload(upload_id).await?;

        state.emitter.capture(&ctx, "DeleteUpload", "Upload", upload_id).await;
        Ok(no_content())
    })
    .await
}
