use std::sync::Arc;

use axum::{body::Bytes, extract::Path, response::Response, Extension, Json};
use modkit::{created_json, no_content};

use crate::api::rest::body::{parse_json, parse_optional_json};
use crate::api::rest::context::AppContext;
use crate::api::rest::dto::{
    report_list, CreateEvaluationReportReq, EvaluationReportDto, SaveEvaluationReportReq,
};
use crate::api::rest::guard::{authorize, Capability};
use crate::api::rest::locator::{parse_uuid, MoveLocator};
use crate::api::rest::precondition::IfMatch;
use crate::api::rest::state::ApiState;
use crate::contract::model::NewEvaluationReport;
use crate::domain::session::RoleType;

const QAE: Capability = Capability::Role(RoleType::Qae);

/// GET /moves/{moveId}/shipment-evaluation-reports-list
pub async fn get_shipment_evaluation_reports(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(move_id): Path<String>,
) -> Response {
    ctx.auditable("GetShipmentEvaluationReports", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let move_id = parse_uuid("moveID", &move_id)?;
        let office_user_id = ctx.office_user_id()?;

        let reports = state
            .services
            .report_fetcher
            .list_shipment_reports(move_id, office_user_id)
            .await?;
        Ok(Json(report_list(&reports)))
    })
    .await
}

/// GET /moves/{moveId}/counseling-evaluation-reports-list
pub async fn get_counseling_evaluation_reports(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(move_id): Path<String>,
) -> Response {
    ctx.auditable("GetCounselingEvaluationReports", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let move_id = parse_uuid("moveID", &move_id)?;
        let office_user_id = ctx.office_user_id()?;

        let reports = state
            .services
            .report_fetcher
            .list_counseling_reports(move_id, office_user_id)
            .await?;
        Ok(Json(report_list(&reports)))
    })
    .await
}

/// POST /moves/{locator}/evaluation-reports
///
/// A body with `shipmentId` creates a shipment report; anything else a
/// counseling report.
pub async fn create_evaluation_report(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(locator): Path<String>,
    body: Bytes,
) -> Response {
    ctx.auditable("CreateEvaluationReport", async {
        authorize(&ctx, QAE)?;
        let locator = MoveLocator::parse(&locator)?;
        let office_user_id = ctx.office_user_id()?;
        let req: CreateEvaluationReportReq = parse_optional_json(&body)?.unwrap_or_default();

        let report = state
            .services
            .report_creator
            .create_report(
                locator.as_str(),
                NewEvaluationReport {
                    shipment_id: req.shipment_id,
                    office_user_id,
                },
            )
            .await?;

        state
            .emitter
            .capture(&ctx, "CreateEvaluationReport", "EvaluationReport", report.id)
            .await;
        Ok(created_json(EvaluationReportDto::from(&report)))
    })
    .await
}

/// GET /evaluation-reports/{reportId}
pub async fn get_evaluation_report(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(report_id): Path<String>,
) -> Response {
    ctx.auditable("GetEvaluationReport", async {
        authorize(&ctx, Capability::OfficeUser)?;
        let report_id = parse_uuid("reportID", &report_id)?;
        let office_user_id = ctx.office_user_id()?;

        let report = state
            .services
            .report_fetcher
            .fetch_report(report_id, office_user_id)
            .await?;
        Ok(Json(EvaluationReportDto::from(&report)))
    })
    .await
}

/// PUT /evaluation-reports/{reportId}
pub async fn save_evaluation_report(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(report_id): Path<String>,
    if_match: IfMatch,
    body: Bytes,
) -> Response {
    ctx.auditable("SaveEvaluationReport", async {
        authorize(&ctx, QAE)?;
        let report_id = parse_uuid("reportID", &report_id)?;
        let etag = if_match.require()?;
        let office_user_id = ctx.office_user_id()?;
        let draft = parse_json::<SaveEvaluationReportReq>(&body)?.into();

        let report = state
            .services
            .report_updater
            .update_report(report_id, office_user_id, draft, etag)
            .await?;

        state
            .emitter
            .capture(&ctx, "SaveEvaluationReport", "EvaluationReport", report.id)
            .await;
        Ok(no_content())
    })
    .await
}

/// POST /evaluation-reports/{reportId}/submit
pub async fn submit_evaluation_report(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(report_id): Path<String>,
    if_match: IfMatch,
) -> Response {
    ctx.auditable("SubmitEvaluationReport", async {
        authorize(&ctx, QAE)?;
        let report_id = parse_uuid("reportID", &report_id)?;
        let etag = if_match.require()?;
        let office_user_id = ctx.office_user_id()?;

        let report = state
            .services
            .report_updater
            .submit_report(report_id, office_user_id, etag)
            .await?;

        state
            .emitter
            .capture(&ctx, "SubmitEvaluationReport", "EvaluationReport", report.id)
            .await;
        Ok(no_content())
    })
    .await
}

/// DELETE /evaluation-reports/{reportId}
pub async fn delete_evaluation_report(
    ctx: AppContext,
    Extension(state): Extension<Arc<ApiState>>,
    Path(report_id): Path<String>,
) -> Response {
    ctx.auditable("DeleteEvaluationReport", async {
        authorize(&ctx, QAE)?;
        let report_id = parse_uuid("reportID", &report_id)?;
        let office_user_id = ctx.office_user_id()?;

        state
            .services
            .report_deleter
            .delete_report(report_id, office_user_id)
            .await?;

        state
            .emitter
            .capture(&ctx, "DeleteEvaluationReport", "EvaluationReport", report_id)
            .await;
        Ok(no_content())
    })
    .await
}
