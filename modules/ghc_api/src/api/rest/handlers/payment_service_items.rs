use std::sync::Arc;

use axum::{body::Bytes, extract::Path, response::Response, Extension, Json};

use crate::api::rest::body::parse_json;
use crate::api::rest::context::AppContext;
use crate::api::rest::dto::{PaymentServiceItemDto, UpdatePaymentServiceItemStatusReq};
use crate::api::rest::guard::{authorize, Capability};
use crate::api::rest::locator::parse_uuid;
use crate::api::rest::precondition::IfMatch;
use crate::api::rest::state::ApiState;
use crate::domain::events::{EndpointKey, EventKey};
use crate::domain::session::RoleType;

/// PATCH /move-task-orders/{moveTaskOrderId}/payment-service-items/{paymentServiceItemId}/status
pub async fn update_payment_service_item_status(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path((move_task_order_id, payment_service_item_id)): Path<(String, String)>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("UpdatePaymentServiceItemStatus", async {
        authorize(&ctx, Capability::Role(RoleType::Tio))?;
        let move_task_order_id = parse_uuid("moveTaskOrderID", &move_task_order_id)?;
        let payment_service_item_id = parse_uuid("paymentServiceItemID", &payment_service_item_id)?;
        let etag = if_match.require()?;
        let (status, rejection_reason) =
            parse_json::<UpdatePaymentServiceItemStatusReq>(&body)?.into_parts()?;

        let item = state
            .services
            .payment_service_item_status_updater
            .update_status(
                move_task_order_id,
                payment_service_item_id,
                status,
                rejection_reason,
                etag,
            )
            .await?;

        state
            .emitter
            .capture(&ctx, "UpdatePaymentServiceItemStatus", "PaymentServiceItem", item.id)
            .await;
        state
            .emitter
            .trigger(
                &ctx,
                EventKey::PaymentRequestUpdate,
                EndpointKey::UpdatePaymentServiceItemStatus,
                item.id,
                item.move_task_order_id,
            )
            .await;
        Ok(Json(PaymentServiceItemDto::from(&item)))
    })
    .await
}
