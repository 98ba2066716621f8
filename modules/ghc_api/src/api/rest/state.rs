use std::sync::Arc;

use crate::api::rest::emitter::Emitter;
use crate::config::GhcApiConfig;
use crate::domain::ports::*;

/// Service-layer collaborators, one field per capability.
#[derive(Clone)]
pub struct Services {
    pub move_fetcher: Arc<dyn MoveFetcher>,
    pub move_searcher: Arc<dyn MoveSearcher>,
    pub move_locker: Arc<dyn MoveLocker>,
    pub financial_review_flag_setter: Arc<dyn MoveFinancialReviewFlagSetter>,
    pub closeout_office_updater: Arc<dyn MoveCloseoutOfficeUpdater>,
    pub move_canceler: Arc<dyn MoveCanceler>,

    pub shipment_fetcher: Arc<dyn ShipmentFetcher>,
    pub shipment_updater: Arc<dyn ShipmentUpdater>,
    pub shipment_deleter: Arc<dyn ShipmentDeleter>,
    pub shipment_approver: Arc<dyn ShipmentApprover>,
    pub diversion_requester: Arc<dyn ShipmentDiversionRequester>,
    pub diversion_approver: Arc<dyn ShipmentDiversionApprover>,
    pub shipment_rejecter: Arc<dyn ShipmentRejecter>,
    pub cancellation_requester: Arc<dyn ShipmentCancellationRequester>,
    pub reweigh_requester: Arc<dyn ShipmentReweighRequester>,
    pub sit_status_fetcher: Arc<dyn ShipmentSitStatusFetcher>,
    pub sit_extension_approver: Arc<dyn SitExtensionApprover>,
    pub sit_extension_denier: Arc<dyn SitExtensionDenier>,

    pub order_fetcher: Arc<dyn OrderFetcher>,
    pub order_updater: Arc<dyn OrderUpdater>,
    pub excess_weight_risk_manager: Arc<dyn ExcessWeightRiskManager>,

    pub report_fetcher: Arc<dyn EvaluationReportFetcher>,
    pub report_creator: Arc<dyn EvaluationReportCreator>,
    pub report_updater: Arc<dyn EvaluationReportUpdater>,
    pub report_deleter: Arc<dyn EvaluationReportDeleter>,

    pub payment_service_item_status_updater: Arc<dyn PaymentServiceItemStatusUpdater>,

    pub customer_fetcher: Arc<dyn CustomerFetcher>,
    pub customer_updater: Arc<dyn CustomerUpdater>,
    pub customer_searcher: Arc<dyn CustomerSearcher>,

    pub document_fetcher: Arc<dyn DocumentFetcher>,
    pub upload_updater: Arc<dyn UploadUpdater>,
    pub upload_deleter: Arc<dyn UploadDeleter>,
}

/// Immutable state shared by every handler.
#[derive(Clone)]
pub struct ApiState {
    pub services: Services,
    pub storer: Arc<dyn FileStorer>,
    pub emitter: Emitter,
    pub config: GhcApiConfig,
}
