use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query},
    response::Response,
    Extension, Json,
};
use chrono::{Duration, Utc};
use tracing::{debug, warn};

use crate::api::rest::body::{parse_json, parse_optional_json};
use crate::api::rest::context::AppContext;
use crate::api::rest::dto::{
    MoveDto, MovesQueueQuery, PageQuery, QueueMovesResultDto, SearchMovesReq,
    SearchMovesResultDto, SetFinancialReviewFlagReq, UpdateCloseoutOfficeReq,
};
use crate::api::rest::guard::{authorize, Capability};
use crate::api::rest::locator::{parse_uuid, MoveLocator};
use crate::api::rest::precondition::IfMatch;
use crate::api::rest::state::ApiState;
use crate::contract::model::OrdersType;
use crate::domain::error::DomainError;
use crate::domain::session::{Privilege, RoleType};

/// GET /moves/{locator}
///
/// Also takes the caller's advisory lock on the move when nobody holds a
/// live one.
pub async fn get_move(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(locator): Path<String>,
) -> Response {
    ctx.auditable("GetMove", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let locator = MoveLocator::parse(&locator)?;
        let svc = &state.services;

        let mut mv = svc.move_fetcher.fetch_move(locator.as_str()).await?;
        if mv.orders_type() == Some(OrdersType::Safety)
            && !ctx.session.has_privilege(Privilege::Safety)
        {
            return Err(DomainError::not_found_msg("Page is inaccessible"));
        }

        let now = Utc::now();
        if !mv.has_live_lock(now) {
            let office_user_id = ctx.office_user_id()?;
            let expires_at = now + Duration::minutes(state.config.lock_duration_minutes);
            mv = svc.move_locker.lock_move(mv.id, office_user_id, expires_at).await?;
            debug!(
                move_id = %mv.id,
                locked_by = ?mv.locked_by_office_user_id,
                "move lock resolved"
            );
        }

        Ok(Json(MoveDto::build(&mv, state.storer.as_ref()).await?))
    })
    .await
}

/// POST /moves/search
pub async fn search_moves(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    body: Bytes,
) -> Response {
    ctx.auditable("SearchMoves", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let req: SearchMovesReq = parse_optional_json(&body)?.unwrap_or_default();
        let cfg = &state.config;
        let page = PageQuery::resolve(req.page, req.per_page, cfg.default_per_page, cfg.max_per_page);

        // Leaving a move for the queue releases the caller's locks.
        let office_user_id = ctx.office_user_id()?;
        if let Err(e) = state.services.move_locker.unlock_moves_for(office_user_id).await {
            warn!(error = %e, "failed to release move locks");
        }

        let params = req.into_params(page);
        let result = state.services.move_searcher.search_moves(&params).await?;
        Ok(Json(SearchMovesResultDto::from(&result)))
    })
    .await
}

/// GET /queues/moves
///
/// The task-ordering queue: a paged move listing filtered from the query
/// string. Like search, opening the queue releases the caller's move locks.
pub async fn get_moves_queue(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    query: Result<Query<MovesQueueQuery>, QueryRejection>,
) -> Response {
    ctx.auditable("GetMovesQueue", async {
        authorize(&ctx, Capability::AnyRole(&[RoleType::Too, RoleType::Headquarters]))?;
        let Query(query) =
            query.map_err(|e| DomainError::bad_data(format!("malformed query string: {e}")))?;
        let cfg = &state.config;
        let page = PageQuery::resolve(
            query.page,
            query.per_page,
            cfg.default_per_page,
            cfg.max_per_page,
        );
        let params = query.into_params(page)?;

        let office_user_id = ctx.office_user_id()?;
        if let Err(e) = state.services.move_locker.unlock_moves_for(office_user_id).await {
            warn!(error = %e, "failed to release move locks");
        }

        let result = state.services.move_searcher.search_moves(&params).await?;
        Ok(Json(QueueMovesResultDto::from(&result)))
    })
    .await
}

/// POST /moves/{moveId}/financial-review-flag
pub async fn set_financial_review_flag(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(move_id): Path<String>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("SetFinancialReviewFlag", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let move_id = parse_uuid("moveID", &move_id)?;
        let etag = if_match.require()?;
        let (flag, remarks) = parse_json::<SetFinancialReviewFlagReq>(&body)?.into_parts()?;

        let mv = state
            .services
            .financial_review_flag_setter
            .set_financial_review_flag(move_id, etag, flag, remarks)
            .await?;

        state.emitter.capture(&ctx, "SetFinancialReviewFlag", "Move", mv.id).await;
        Ok(Json(MoveDto::build(&mv, state.storer.as_ref()).await?))
    })
    .await
}

/// PATCH /moves/{locator}/closeout-office
pub async fn update_closeout_office(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(locator): Path<String>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("UpdateCloseoutOffice", async {
        authorize(&ctx, Capability::Role(RoleType::ServicesCounselor))?;
        let locator = MoveLocator::parse(&locator)?;
        let etag = if_match.require()?;
        let office_id = parse_json::<UpdateCloseoutOfficeReq>(&body)?.office_id()?;

        let mv = state
            .services
            .closeout_office_updater
            .update_closeout_office(locator.as_str(), office_id, etag)
            .await?;

        state.emitter.capture(&ctx, "UpdateCloseoutOffice", "Move", mv.id).await;
        Ok(Json(MoveDto::build(&mv, state.storer.as_ref()).await?))
    })
    .await
}

/// POST /moves/{moveId}/cancel
pub async fn cancel_move(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(move_id): Path<String>,
) -> Response {
    ctx.auditable("MoveCanceler", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let move_id = parse_uuid("moveID", &move_id)?;

        let mv = state.services.move_canceler.cancel_move(move_id).await?;

        state.emitter.capture(&ctx, "MoveCanceler", "Move", mv.id).await;
        Ok(Json(MoveDto::build(&mv, state.storer.as_ref()).await?))
    })
    .await
}
