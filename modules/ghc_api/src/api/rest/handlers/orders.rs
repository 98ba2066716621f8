use std::sync::Arc;

use axum::{body::Bytes, extract::Path, response::Response, Extension, Json};
use uuid::Uuid;

use crate::api::rest::body::parse_json;
use crate::api::rest::context::AppContext;
use crate::api::rest::dto::{
    CounselingUpdateOrderReq, MoveDto, OrderDto, UpdateAllowanceReq, UpdateBillableWeightReq,
    UpdateMaxBillableWeightAsTioReq, UpdateOrderReq,
};
use crate::api::rest::guard::{authorize, Capability};
use crate::api::rest::locator::parse_uuid;
use crate::api::rest::precondition::IfMatch;
use crate::api::rest::state::ApiState;
use crate::contract::model::Order;
use crate::domain::events::{EndpointKey, EventKey};
use crate::domain::session::RoleType;

async fn emit_order_update(
    ctx: &AppContext,
    state: &ApiState,
    operation: &'static str,
    endpoint_key: EndpointKey,
    order: &Order,
    move_id: Uuid,
) {
    state.emitter.capture(ctx, operation, "Order", order.id).await;
    state
        .emitter
        .trigger(ctx, EventKey::OrderUpdate, endpoint_key, order.id, move_id)
        .await;
}

/// GET /orders/{orderId}
pub async fn get_order(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(order_id): Path<String>,
) -> Response {
    ctx.auditable("GetOrder", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let order_id = parse_uuid("orderID", &order_id)?;

        let order = state.services.order_fetcher.fetch_order(order_id).await?;
        Ok(Json(OrderDto::from(&order)))
    })
    .await
}

/// PATCH /orders/{orderId}
pub async fn update_order(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(order_id): Path<String>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("UpdateOrder", async {
        authorize(&ctx, Capability::AnyRole(&[RoleType::Too, RoleType::Tio]))?;
        let order_id = parse_uuid("orderID", &order_id)?;
        let etag = if_match.require()?;
        let patch = parse_json::<UpdateOrderReq>(&body)?.into_patch()?;

        let (order, move_id) = state
            .services
            .order_updater
            .update_order_as_too(order_id, etag, patch)
            .await?;

        emit_order_update(&ctx, &state, "UpdateOrder", EndpointKey::UpdateOrder, &order, move_id)
            .await;
        Ok(Json(OrderDto::from(&order)))
    })
    .await
}

/// PATCH /counseling/orders/{orderId}
pub async fn counseling_update_order(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(order_id): Path<String>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("CounselingUpdateOrder", async {
        authorize(&ctx, Capability::Role(RoleType::ServicesCounselor))?;
        let order_id = parse_uuid("orderID", &order_id)?;
        let etag = if_match.require()?;
        let patch = parse_json::<CounselingUpdateOrderReq>(&body)?.into_patch()?;

        let (order, move_id) = state
            .services
            .order_updater
            .update_order_as_counselor(order_id, etag, patch)
            .await?;

        emit_order_update(
            &ctx,
            &state,
            "CounselingUpdateOrder",
            EndpointKey::CounselingUpdateOrder,
            &order,
            move_id,
        )
        .await;
        Ok(Json(OrderDto::from(&order)))
    })
    .await
}

/// PATCH /orders/{orderId}/allowances
pub async fn update_allowance(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(order_id): Path<String>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("UpdateAllowance", async {
        authorize(&ctx, Capability::Role(RoleType::Too))?;
        let order_id = parse_uuid("orderID", &order_id)?;
        let etag = if_match.require()?;
        let patch = parse_json::<UpdateAllowanceReq>(&body)?.into_patch()?;

        let (order, move_id) = state
            .services
            .order_updater
            .update_allowance_as_too(order_id, etag, patch)
            .await?;

        emit_order_update(
            &ctx,
            &state,
            "UpdateAllowance",
            EndpointKey::UpdateAllowance,
            &order,
            move_id,
        )
        .await;
        Ok(Json(OrderDto::from(&order)))
    })
    .await
}

/// PATCH /counseling/orders/{orderId}/allowances
pub async fn counseling_update_allowance(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(order_id): Path<String>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("CounselingUpdateAllowance", async {
        authorize(&ctx, Capability::Role(RoleType::ServicesCounselor))?;
        let order_id = parse_uuid("orderID", &order_id)?;
        let etag = if_match.require()?;
        let patch = parse_json::<UpdateAllowanceReq>(&body)?.into_patch()?;

        let (order, move_id) = state
            .services
            .order_updater
            .update_allowance_as_counselor(order_id, etag, patch)
            .await?;

        emit_order_update(
            &ctx,
            &state,
            "CounselingUpdateAllowance",
            EndpointKey::CounselingUpdateAllowance,
            &order,
            move_id,
        )
        .await;
        Ok(Json(OrderDto::from(&order)))
    })
    .await
}

/// PATCH /orders/{orderId}/update-billable-weight
pub async fn update_billable_weight(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(order_id): Path<String>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("UpdateBillableWeight", async {
        authorize(&ctx, Capability::Role(RoleType::Too))?;
        let order_id = parse_uuid("orderID", &order_id)?;
        let etag = if_match.require()?;
        let weight = parse_json::<UpdateBillableWeightReq>(&body)?.weight()?;

        let (order, move_id) = state
            .services
            .excess_weight_risk_manager
            .update_billable_weight(order_id, weight, etag)
            .await?;

        emit_order_update(
            &ctx,
            &state,
            "UpdateBillableWeight",
            EndpointKey::UpdateBillableWeight,
            &order,
            move_id,
        )
        .await;
        Ok(Json(OrderDto::from(&order)))
    })
    .await
}

/// PATCH /orders/{orderId}/update-billable-weight/tio
pub async fn update_max_billable_weight_as_tio(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(order_id): Path<String>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("UpdateMaxBillableWeightAsTIO", async {
        authorize(&ctx, Capability::Role(RoleType::Tio))?;
        let order_id = parse_uuid("orderID", &order_id)?;
        let etag = if_match.require()?;
        let (weight, remarks) = parse_json::<UpdateMaxBillableWeightAsTioReq>(&body)?.into_parts()?;

        let (order, move_id) = state
            .services
            .excess_weight_risk_manager
            .update_max_billable_weight_as_tio(order_id, weight, remarks, etag)
            .await?;

        emit_order_update(
            &ctx,
            &state,
            "UpdateMaxBillableWeightAsTIO",
            EndpointKey::UpdateMaxBillableWeightAsTio,
            &order,
            move_id,
        )
        .await;
        Ok(Json(OrderDto::from(&order)))
    })
    .await
}

/// POST /orders/{orderId}/acknowledge-excess-weight-risk
///
/// `If-Match` carries the move's token, not the order's.
pub async fn acknowledge_excess_weight_risk(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(order_id): Path<String>,
    if_match: IfMatch,
) -> Response {
    ctx.auditable("AcknowledgeExcessWeightRisk", async {
        authorize(&ctx, Capability::Role(RoleType::Too))?;
        let order_id = parse_uuid("orderID", &order_id)?;
        let etag = if_match.require()?;

        let mv = state
            .services
            .excess_weight_risk_manager
            .acknowledge_excess_weight_risk(order_id, etag)
            .await?;

        state
            .emitter
            .capture(&ctx, "AcknowledgeExcessWeightRisk", "Move", mv.id)
            .await;
        state
            .emitter
            .trigger(
                &ctx,
                EventKey::MoveTaskOrderUpdate,
                EndpointKey::AcknowledgeExcessWeightRisk,
                mv.id,
                mv.id,
            )
            .await;
        Ok(Json(MoveDto::build(&mv, state.storer.as_ref()).await?))
    })
    .await
}
