use std::sync::Arc;

use axum::{body::Bytes, extract::Path, response::Response, Extension, Json};

use crate::api::rest::body::{parse_json, parse_optional_json};
use crate::api::rest::context::AppContext;
use crate::api::rest::dto::{
    CustomerDto, PageQuery, SearchCustomersReq, SearchCustomersResultDto, UpdateCustomerReq,
};
use crate::api::rest::guard::{authorize, Capability};
use crate::api::rest::locator::parse_uuid;
use crate::api::rest::precondition::IfMatch;
use crate::api::rest::state::ApiState;

/// GET /customer/{customerId}
pub async fn get_customer(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(customer_id): Path<String>,
) -> Response {
    ctx.auditable("GetCustomer", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let customer_id = parse_uuid("customerID", &customer_id)?;

        let customer = state.services.customer_fetcher.fetch_customer(customer_id).await?;
        Ok(Json(CustomerDto::from(&customer)))
    })
    .await
}

/// PATCH /customer/{customerId}
pub async fn update_customer(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(customer_id): Path<String>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("UpdateCustomer", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let customer_id = parse_uuid("customerID", &customer_id)?;
        let etag = if_match.require()?;
        let patch = parse_json::<UpdateCustomerReq>(&body)?.into_patch()?;

        let customer = state
            .services
            .customer_updater
            .update_customer(customer_id, patch, etag)
            .await?;

        state.emitter.capture(&ctx, "UpdateCustomer", "Customer", customer.id).await;
        Ok(Json(CustomerDto::from(&customer)))
    })
    .await
}

/// POST /customer/search
pub async fn search_customers(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    body: Bytes,
) -> Response {
    ctx.auditable("SearchCustomers", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let req: SearchCustomersReq = parse_optional_json(&body)?.unwrap_or_default();
        let cfg = &state.config;
        let page = PageQuery::resolve(req.page, req.per_page, cfg.default_per_page, cfg.max_per_page);

        let result = state
            .services
            .customer_searcher
            .search_customers(&req.into_params(page))
            .await?;
        Ok(Json(SearchCustomersResultDto::from(&result)))
    })
    .await
}
