use std::sync::Arc;

use axum::{body::Bytes, extract::Path, response::Response, Extension, Json};
use modkit::no_content;
use tracing::warn;

use crate::api::rest::body::{parse_json, parse_optional_json};
use crate::api::rest::context::AppContext;
use crate::api::rest::dto::{
    ApproveSitExtensionReq, DenySitExtensionReq, MtoShipmentDto, RejectShipmentReq,
    RequestDiversionReq, ReweighDto, UpdateShipmentReq,
};
use crate::api::rest::guard::{authorize, Capability};
use crate::api::rest::locator::parse_uuid;
use crate::api::rest::precondition::IfMatch;
use crate::api::rest::state::ApiState;
use crate::contract::model::{MtoShipment, ReweighRequester};
use crate::domain::error::DomainError;
use crate::domain::events::{EndpointKey, EventKey};
use crate::domain::session::RoleType;

const TOO: Capability = Capability::Role(RoleType::Too);
const SHIPMENT_EDITORS: Capability =
    Capability::AnyRole(&[RoleType::Too, RoleType::Tio, RoleType::ServicesCounselor]);
const SHIPMENT_DELETERS: Capability =
    Capability::AnyRole(&[RoleType::Too, RoleType::ServicesCounselor]);

async fn shipment_payload(
    state: &ApiState,
    shipment: &MtoShipment,
) -> Result<MtoShipmentDto, DomainError> {
    let sit = state.services.sit_status_fetcher.sit_status(shipment).await?;
    Ok(MtoShipmentDto::build(shipment, sit.as_ref()))
}

/// Audit and notify after a successful shipment transition.
async fn emit_shipment_change(
    ctx: &AppContext,
    state: &ApiState,
    operation: &'static str,
    event_key: EventKey,
    endpoint_key: EndpointKey,
    shipment: &MtoShipment,
) {
    state.emitter.capture(ctx, operation, "MTOShipment", shipment.id).await;
    state
        .emitter
        .trigger(ctx, event_key, endpoint_key, shipment.id, shipment.move_task_order_id)
        .await;
}

/// GET /moves/{moveId}/mto-shipments
pub async fn list_mto_shipments(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(move_id): Path<String>,
) -> Response {
    ctx.auditable("ListMTOShipments", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let move_id = parse_uuid("moveID", &move_id)?;

        let shipments = state.services.shipment_fetcher.list_shipments(move_id).await?;
        let mut payload = Vec::with_capacity(shipments.len());
        for s in &shipments {
            payload.push(shipment_payload(&state, s).await?);
        }
        Ok(Json(payload))
    })
    .await
}

/// GET /shipments/{shipmentId}
pub async fn get_shipment(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(shipment_id): Path<String>,
) -> Response {
    ctx.auditable("GetShipment", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let shipment_id = parse_uuid("shipmentID", &shipment_id)?;

        let shipment = state.services.shipment_fetcher.fetch_shipment(shipment_id).await?;
        Ok(Json(shipment_payload(&state, &shipment).await?))
    })
    .await
}

/// PATCH /shipments/{shipmentId}
pub async fn update_shipment(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(shipment_id): Path<String>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("UpdateShipment", async {
        authorize(&ctx, SHIPMENT_EDITORS)?;
        let shipment_id = parse_uuid("shipmentID", &shipment_id)?;
        let etag = if_match.require()?;
        let patch = parse_json::<UpdateShipmentReq>(&body)?.into_patch()?;

        let shipment = state
            .services
            .shipment_updater
            .update_shipment(shipment_id, etag, patch, &ctx.session.roles)
            .await?;

        emit_shipment_change(
            &ctx,
            &state,
            "UpdateShipment",
            EventKey::ShipmentUpdate,
            EndpointKey::UpdateShipment,
            &shipment,
        )
        .await;
        Ok(Json(shipment_payload(&state, &shipment).await?))
    })
    .await
}

/// DELETE /shipments/{shipmentId}
pub async fn delete_shipment(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(shipment_id): Path<String>,
) -> Response {
    ctx.auditable("DeleteShipment", async {
        authorize(&ctx, SHIPMENT_DELETERS)?;
        let shipment_id = parse_uuid("shipmentID", &shipment_id)?;

        let move_id = state
            .services
            .shipment_deleter
            .delete_shipment(shipment_id)
            .await?;

        state
            .emitter
            .capture(&ctx, "DeleteShipment", "MTOShipment", shipment_id)
            .await;
        state
            .emitter
            .trigger(
                &ctx,
                EventKey::ShipmentDelete,
                EndpointKey::DeleteShipment,
                shipment_id,
                move_id,
            )
            .await;
        Ok(no_content())
    })
    .await
}

/// POST /shipments/{shipmentId}/approve
pub async fn approve_shipment(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(shipment_id): Path<String>,
    if_match: IfMatch,
) -> Response {
    ctx.auditable("ApproveShipment", async {
        authorize(&ctx, TOO)?;
        let shipment_id = parse_uuid("shipmentID", &shipment_id)?;
        let etag = if_match.require()?;

        let shipment = state
            .services
            .shipment_approver
            .approve_shipment(shipment_id, etag)
            .await?;

        emit_shipment_change(
            &ctx,
            &state,
            "ApproveShipment",
            EventKey::ShipmentApprove,
            EndpointKey::ApproveShipment,
            &shipment,
        )
        .await;
        Ok(Json(shipment_payload(&state, &shipment).await?))
    })
    .await
}

/// POST /shipments/{shipmentId}/request-diversion
pub async fn request_shipment_diversion(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(shipment_id): Path<String>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("RequestShipmentDiversion", async {
        authorize(&ctx, TOO)?;
        let shipment_id = parse_uuid("shipmentID", &shipment_id)?;
        let etag = if_match.require()?;
        let reason = parse_json::<RequestDiversionReq>(&body)?.reason()?;

        let shipment = state
            .services
            .diversion_requester
            .request_diversion(shipment_id, etag, reason)
            .await?;

        emit_shipment_change(
            &ctx,
            &state,
            "RequestShipmentDiversion",
            EventKey::ShipmentRequestDiversion,
            EndpointKey::RequestShipmentDiversion,
            &shipment,
        )
        .await;
        Ok(Json(shipment_payload(&state, &shipment).await?))
    })
    .await
}

/// POST /shipments/{shipmentId}/approve-diversion
pub async fn approve_shipment_diversion(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(shipment_id): Path<String>,
    if_match: IfMatch,
) -> Response {
    ctx.auditable("ApproveShipmentDiversion", async {
        authorize(&ctx, TOO)?;
        let shipment_id = parse_uuid("shipmentID", &shipment_id)?;
        let etag = if_match.require()?;

        let shipment = state
            .services
            .diversion_approver
            .approve_diversion(shipment_id, etag)
            .await?;

        emit_shipment_change(
            &ctx,
            &state,
            "ApproveShipmentDiversion",
            EventKey::ShipmentApproveDiversion,
            EndpointKey::ApproveShipmentDiversion,
            &shipment,
        )
        .await;
        Ok(Json(shipment_payload(&state, &shipment).await?))
    })
    .await
}

/// POST /shipments/{shipmentId}/reject
pub async fn reject_shipment(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(shipment_id): Path<String>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("RejectShipment", async {
        authorize(&ctx, TOO)?;
        let shipment_id = parse_uuid("shipmentID", &shipment_id)?;
        let etag = if_match.require()?;
        let reason = parse_json::<RejectShipmentReq>(&body)?.reason()?;

        let shipment = state
            .services
            .shipment_rejecter
            .reject_shipment(shipment_id, etag, reason)
            .await?;

        emit_shipment_change(
            &ctx,
            &state,
            "RejectShipment",
            EventKey::ShipmentReject,
            EndpointKey::RejectShipment,
            &shipment,
        )
        .await;
        Ok(Json(shipment_payload(&state, &shipment).await?))
    })
    .await
}

/// POST /shipments/{shipmentId}/request-cancellation
pub async fn request_shipment_cancellation(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(shipment_id): Path<String>,
    if_match: IfMatch,
) -> Response {
    ctx.auditable("RequestShipmentCancellation", async {
        authorize(&ctx, TOO)?;
        let shipment_id = parse_uuid("shipmentID", &shipment_id)?;
        let etag = if_match.require()?;

        let shipment = state
            .services
            .cancellation_requester
            .request_cancellation(shipment_id, etag)
            .await?;

        emit_shipment_change(
            &ctx,
            &state,
            "RequestShipmentCancellation",
            EventKey::ShipmentRequestCancellation,
            EndpointKey::RequestShipmentCancellation,
            &shipment,
        )
        .await;
        Ok(Json(shipment_payload(&state, &shipment).await?))
    })
    .await
}

/// POST /shipments/{shipmentId}/request-reweigh
///
/// No `If-Match`: a reweigh can only be requested once per shipment.
pub async fn request_shipment_reweigh(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(shipment_id): Path<String>,
) -> Response {
    ctx.auditable("RequestShipmentReweigh", async {
        authorize(&ctx, TOO)?;
        let shipment_id = parse_uuid("shipmentID", &shipment_id)?;

        let reweigh = state
            .services
            .reweigh_requester
            .request_reweigh(shipment_id, ReweighRequester::Too)
            .await?;

        state
            .emitter
            .capture(&ctx, "RequestShipmentReweigh", "Reweigh", reweigh.id)
            .await;
        // The event needs the move id, which only the shipment carries.
        match state.services.shipment_fetcher.fetch_shipment(reweigh.shipment_id).await {
            Ok(shipment) => {
                state
                    .emitter
                    .trigger(
                        &ctx,
                        EventKey::ShipmentRequestReweigh,
                        EndpointKey::RequestShipmentReweigh,
                        shipment.id,
                        shipment.move_task_order_id,
                    )
                    .await
            }
            Err(e) => warn!(error = %e, "reweigh event skipped: shipment lookup failed"),
        }
        Ok(Json(ReweighDto::from(&reweigh)))
    })
    .await
}

/// POST /shipments/{shipmentId}/sit-extensions/{sitExtensionId}/approve
pub async fn approve_sit_extension(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path((shipment_id, sit_extension_id)): Path<(String, String)>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("ApproveSITExtension", async {
        authorize(&ctx, TOO)?;
        let shipment_id = parse_uuid("shipmentID", &shipment_id)?;
        let sit_extension_id = parse_uuid("sitExtensionID", &sit_extension_id)?;
        let etag = if_match.require()?;
        let req = parse_json::<ApproveSitExtensionReq>(&body)?;
        let approved_days = req.approved_days()?;

        let shipment = state
            .services
            .sit_extension_approver
            .approve_sit_extension(
                shipment_id,
                sit_extension_id,
                approved_days,
                req.request_reason,
                req.office_remarks,
                etag,
            )
            .await?;

        emit_shipment_change(
            &ctx,
            &state,
            "ApproveSITExtension",
            EventKey::ShipmentApproveSitExtension,
            EndpointKey::ApproveSitExtension,
            &shipment,
        )
        .await;
        Ok(Json(shipment_payload(&state, &shipment).await?))
    })
    .await
}

/// POST /shipments/{shipmentId}/sit-extensions/{sitExtensionId}/deny
pub async fn deny_sit_extension(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path((shipment_id, sit_extension_id)): Path<(String, String)>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("DenySITExtension", async {
        authorize(&ctx, TOO)?;
        let shipment_id = parse_uuid("shipmentID", &shipment_id)?;
        let sit_extension_id = parse_uuid("sitExtensionID", &sit_extension_id)?;
        let etag = if_match.require()?;
        let req: DenySitExtensionReq = parse_optional_json(&body)?.unwrap_or_default();

        let shipment = state
            .services
            .sit_extension_denier
            .deny_sit_extension(
                shipment_id,
                sit_extension_id,
                req.office_remarks,
                req.convert_to_customer_expense.unwrap_or(false),
                etag,
            )
            .await?;

        emit_shipment_change(
            &ctx,
            &state,
            "DenySITExtension",
            EventKey::ShipmentDenySitExtension,
            EndpointKey::DenySitExtension,
            &shipment,
        )
        .await;
        Ok(Json(shipment_payload(&state, &shipment).await?))
    })
    .await
}
