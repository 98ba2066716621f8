use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Extension, Router,
};

use crate::api::rest::handlers::{
    customers, evaluation_reports, moves, orders, payment_service_items, shipments, uploads,
};
use crate::api::rest::openapi::openapi_json;
use crate::api::rest::session::attach_session;
use crate::api::rest::state::ApiState;
use crate::domain::ports::SessionResolver;

/// Build the module router, mounted under `config.base_path`.
///
/// Path parameters share names per position (`{id}`, then `{sub_id}`) so the
/// route tree stays unambiguous.
pub fn router(state: Arc<ApiState>, sessions: Arc<dyn SessionResolver>) -> Router {
    let api = Router::new()
        // moves
        .route("/queues/moves", get(moves::get_moves_queue))
        .route("/moves/search", post(moves::search_moves))
        .route("/moves/{id}", get(moves::get_move))
        .route(
            "/moves/{id}/financial-review-flag",
            post(moves::set_financial_review_flag),
        )
        .route(
            "/moves/{id}/closeout-office",
            patch(moves::update_closeout_office),
        )
        .route("/moves/{id}/cancel", post(moves::cancel_move))
        .route("/moves/{id}/mto-shipments", get(shipments::list_mto_shipments))
        .route(
            "/moves/{id}/shipment-evaluation-reports-list",
            get(evaluation_reports::get_shipment_evaluation_reports),
        )
        .route(
            "/moves/{id}/counseling-evaluation-reports-list",
            get(evaluation_reports::get_counseling_evaluation_reports),
        )
        .route(
            "/moves/{id}/evaluation-reports",
            post(evaluation_reports::create_evaluation_report),
        )
        // shipments
        .route(
            "/shipments/{id}",
            get(shipments::get_shipment)
                .patch(shipments::update_shipment)
                .delete(shipments::delete_shipment),
        )
        .route("/shipments/{id}/approve", post(shipments::approve_shipment))
        .route(
            "/shipments/{id}/request-diversion",
            post(shipments::request_shipment_diversion),
        )
        .route(
            "/shipments/{id}/approve-diversion",
            post(shipments::approve_shipment_diversion),
        )
        .route("/shipments/{id}/reject", post(shipments::reject_shipment))
        .route(
            "/shipments/{id}/request-cancellation",
            post(shipments::request_shipment_cancellation),
        )
        .route(
            "/shipments/{id}/request-reweigh",
            post(shipments::request_shipment_reweigh),
        )
        .route(
            "/shipments/{id}/sit-extensions/{sub_id}/approve",
            post(shipments::approve_sit_extension),
        )
        .route(
            "/shipments/{id}/sit-extensions/{sub_id}/deny",
            post(shipments::deny_sit_extension),
        )
        // orders
        .route(
            "/orders/{id}",
            get(orders::get_order).patch(orders::update_order),
        )
        .route("/orders/{id}/allowances", patch(orders::update_allowance))
        .route(
            "/orders/{id}/update-billable-weight",
            patch(orders::update_billable_weight),
        )
        .route(
            "/orders/{id}/update-billable-weight/tio",
            patch(orders::update_max_billable_weight_as_tio),
        )
        .route(
            "/orders/{id}/acknowledge-excess-weight-risk",
            post(orders::acknowledge_excess_weight_risk),
        )
        .route(
            "/counseling/orders/{id}",
            patch(orders::counseling_update_order),
        )
        .route(
            "/counseling/orders/{id}/allowances",
            patch(orders::counseling_update_allowance),
        )
        // evaluation reports
        .route(
            "/evaluation-reports/{id}",
            get(evaluation_reports::get_evaluation_report)
                .put(evaluation_reports::save_evaluation_report)
                .delete(evaluation_reports::delete_evaluation_report),
        )
        .route(
            "/evaluation-reports/{id}/submit",
            post(evaluation_reports::submit_evaluation_report),
        )
        // payment service items
        .route(
            "/move-task-orders/{id}/payment-service-items/{sub_id}/status",
            patch(payment_service_items::update_payment_service_item_status),
        )
        // customers
        .route("/customer/search", post(customers::search_customers))
        .route(
            "/customer/{id}",
            get(customers::get_customer).patch(customers::update_customer),
        )
        // documents
        .route("/documents/{id}", get(uploads::get_document))
        .route(
            "/uploads/{id}",
            patch(uploads::update_upload).delete(uploads::delete_upload),
        )
        .route("/openapi.json", get(openapi_json))
        .layer(middleware::from_fn_with_state(sessions, attach_session))
        .layer(Extension(state.clone()));

    let base = state.config.base_path.trim_end_matches('/');
    if base.is_empty() {
        api
    } else {
        Router::new().nest(base, api)
    }
}
