use axum::Json;
use utoipa::OpenApi;

use crate::api::rest::dto;
use crate::contract::model;

#[derive(OpenApi)]
#[openapi(
    info(title = "GHC Office API", description = "Back-office move management API"),
    components(schemas(
        modkit::Problem,
        model::MoveStatus,
        model::OrdersType,
        model::ShipmentStatus,
        model::ShipmentType,
        model::SitExtensionStatus,
        model::ReweighRequester,
        model::EvaluationReportType,
        model::InspectionType,
        model::EvaluationReportLocation,
        model::PaymentServiceItemStatus,
        model::UploadType,
        model::SortOrder,
        dto::AddressDto,
        dto::MoveDto,
        dto::SearchMovesReq,
        dto::SearchMoveDto,
        dto::SearchMoveCustomerDto,
        dto::SearchMovesResultDto,
        dto::QueueMoveDto,
        dto::QueueMovesResultDto,
        dto::SetFinancialReviewFlagReq,
        dto::UpdateCloseoutOfficeReq,
        dto::MtoShipmentDto,
        dto::SitExtensionDto,
        dto::SitStatusDto,
        dto::CurrentSitDto,
        dto::ReweighDto,
        dto::AddressReq,
        dto::UpdateShipmentReq,
        dto::RequestDiversionReq,
        dto::RejectShipmentReq,
        dto::ApproveSitExtensionReq,
        dto::DenySitExtensionReq,
        dto::OrderDto,
        dto::DutyLocationDto,
        dto::EntitlementDto,
        dto::UpdateOrderReq,
        dto::CounselingUpdateOrderReq,
        dto::UpdateAllowanceReq,
        dto::UpdateBillableWeightReq,
        dto::UpdateMaxBillableWeightAsTioReq,
        dto::EvaluationReportDto,
        dto::EvaluationReportOfficeUserDto,
        dto::CreateEvaluationReportReq,
        dto::SaveEvaluationReportReq,
        dto::PaymentServiceItemDto,
        dto::UpdatePaymentServiceItemStatusReq,
        dto::CustomerDto,
        dto::UpdateCustomerReq,
        dto::SearchCustomersReq,
        dto::SearchCustomerDto,
        dto::SearchCustomersResultDto,
        dto::DocumentDto,
        dto::UploadDto,
        dto::UpdateUploadReq,
    )),
    tags((name = "ghc", description = "Back-office move management"))
)]
pub struct ApiDoc;

/// GET /openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
