//! Shared test harness: a counting mock for every service port, recording
//! audit/event sinks, session builders and request helpers.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use parking_lot::Mutex;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use ghc_api::api::rest::context::AppContext;
use ghc_api::api::rest::emitter::Emitter;
use ghc_api::api::rest::routes;
use ghc_api::api::rest::state::{ApiState, Services};
use ghc_api::config::GhcApiConfig;
use ghc_api::contract::model::*;
use ghc_api::domain::error::{DomainError, ErrorKind};
use ghc_api::domain::events::{AuditRecord, Event};
use ghc_api::domain::ports::*;
use ghc_api::domain::session::{Application, Privilege, RoleType, Session};
use ghc_api::infra::seed;
use ghc_api::infra::{InMemoryStore, LocalFileStorer, StaticSessionResolver};
use ghc_api::GhcApi;

// ----- sessions -----

pub fn office_with(roles: &[RoleType]) -> Session {
    Session::office(Uuid::new_v4(), roles.iter().copied())
}

pub fn office_user() -> Session {
    office_with(&[])
}

pub fn too() -> Session {
    office_with(&[RoleType::Too])
}

pub fn tio() -> Session {
    office_with(&[RoleType::Tio])
}

pub fn counselor() -> Session {
    office_with(&[RoleType::ServicesCounselor])
}

pub fn qae() -> Session {
    office_with(&[RoleType::Qae])
}

pub fn hq() -> Session {
    office_with(&[RoleType::Headquarters])
}

pub fn safety_too() -> Session {
    too().with_privilege(Privilege::Safety)
}

/// A customer signed into the member app; never an office user.
pub fn customer() -> Session {
    Session {
        application: Application::Mil,
        user_id: Uuid::new_v4(),
        office_user_id: None,
        service_member_id: Some(Uuid::new_v4()),
        email: "member@example.com".into(),
        roles: vec![RoleType::Customer],
        privileges: Vec::new(),
    }
}

// ----- errors -----

pub const ALL_KINDS: [ErrorKind; 9] = [
    ErrorKind::NotFound,
    ErrorKind::InvalidInput,
    ErrorKind::PreconditionFailed,
    ErrorKind::Conflict,
    ErrorKind::Forbidden,
    ErrorKind::Unauthorized,
    ErrorKind::BadData,
    ErrorKind::Query,
    ErrorKind::Unexpected,
];

pub fn error_of(kind: ErrorKind) -> DomainError {
    match kind {
        ErrorKind::NotFound => DomainError::not_found("Thing", "x"),
        ErrorKind::InvalidInput => DomainError::invalid_field("field", "is wrong"),
        ErrorKind::PreconditionFailed => DomainError::precondition_failed("Thing", "x"),
        ErrorKind::Conflict => DomainError::conflict("state does not allow this"),
        ErrorKind::Forbidden => DomainError::forbidden("not yours"),
        ErrorKind::Unauthorized => DomainError::unauthorized("who are you"),
        ErrorKind::BadData => DomainError::bad_data("garbled"),
        ErrorKind::Query => {
            DomainError::query_from("fetch rows", std::io::Error::other("connection reset"))
        }
        ErrorKind::Unexpected => DomainError::unexpected("storage exploded"),
    }
}

pub fn status_of(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::PreconditionFailed => StatusCode::PRECONDITION_FAILED,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::BadData => StatusCode::BAD_REQUEST,
        ErrorKind::Query | ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ----- fixtures -----

/// Records taken from the demo seed, plus a hand-built evaluation report.
#[derive(Clone)]
pub struct Fixtures {
    pub mv: Move,
    pub shipment: MtoShipment,
    pub sit_status: SitStatus,
    pub order: Order,
    pub customer: Customer,
    pub document: Document,
    pub payment_service_item: PaymentServiceItem,
    pub report: EvaluationReport,
}

impl Fixtures {
    pub fn load() -> Self {
        let store = InMemoryStore::new();
        let storer = LocalFileStorer::new("http://files.test", "secret", 900).unwrap();
        seed::demo_data(&store, &storer);
        let t = store.read();
        let mv = t.assemble_move(seed::DEMO_MOVE_ID).unwrap();
        let now = Utc::now();
        let report = EvaluationReport {
            id: Uuid::new_v4(),
            move_id: mv.id,
            move_reference_id: mv.reference_id.clone(),
            shipment_id: None,
            report_type: EvaluationReportType::Counseling,
            office_user: OfficeUserRef {
                id: seed::DEMO_OFFICE_USER_ID,
                first_name: "Quinn".into(),
                last_name: "Evaluator".into(),
                email: "qae@example.com".into(),
            },
            inspection_date: None,
            inspection_type: None,
            location: None,
            location_description: None,
            observed_shipment_delivery_date: None,
            observed_shipment_physical_pickup_date: None,
            time_depart: None,
            eval_start: None,
            eval_end: None,
            violations_observed: None,
            remarks: None,
            serious_incident: None,
            serious_incident_desc: None,
            submitted_at: None,
            created_at: now,
            updated_at: now,
        };
        Self {
            shipment: t.shipments[&seed::DEMO_APPROVED_SHIPMENT_ID].clone(),
            sit_status: t.sit_statuses[&seed::DEMO_APPROVED_SHIPMENT_ID].clone(),
            order: t.assemble_order(seed::DEMO_ORDER_ID).unwrap(),
            customer: t.customers[&seed::DEMO_CUSTOMER_ID].clone(),
            document: t.assemble_document(seed::DEMO_DOCUMENT_ID).unwrap(),
            payment_service_item: t.payment_service_items[&seed::DEMO_PAYMENT_SERVICE_ITEM_ID]
                .clone(),
            mv,
            report,
        }
    }
}

// ----- mock services -----

/// Implements every service port. Each call is counted; when `fail_with` is
/// set every call returns that error kind instead of a fixture.
pub struct MockServices {
    total: AtomicUsize,
    calls: Mutex<HashMap<&'static str, usize>>,
    fail: Mutex<Option<ErrorKind>>,
    pub fixtures: Fixtures,
    /// Parameters of the most recent move search.
    pub last_search: Mutex<Option<SearchMovesParams>>,
}

impl MockServices {
    pub fn new() -> Self {
        Self {
            total: AtomicUsize::new(0),
            calls: Mutex::new(HashMap::new()),
            fail: Mutex::new(None),
            fixtures: Fixtures::load(),
            last_search: Mutex::new(None),
        }
    }

    pub fn fail_with(&self, kind: ErrorKind) {
        *self.fail.lock() = Some(kind);
    }

    pub fn total_calls(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn calls(&self, op: &str) -> usize {
        self.calls.lock().get(op).copied().unwrap_or(0)
    }

    fn hit(&self, op: &'static str) -> Result<(), DomainError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self.calls.lock().entry(op).or_default() += 1;
        match *self.fail.lock() {
            Some(kind) => Err(error_of(kind)),
            None => Ok(()),
        }
    }

    fn order_pair(&self) -> (Order, Uuid) {
        (self.fixtures.order.clone(), self.fixtures.mv.id)
    }
}

pub fn services_from(mock: Arc<MockServices>) -> Services {
    Services {
        move_fetcher: mock.clone(),
        move_searcher: mock.clone(),
        move_locker: mock.clone(),
        financial_review_flag_setter: mock.clone(),
        closeout_office_updater: mock.clone(),
        move_canceler: mock.clone(),
        shipment_fetcher: mock.clone(),
        shipment_updater: mock.clone(),
        shipment_deleter: mock.clone(),
        shipment_approver: mock.clone(),
        diversion_requester: mock.clone(),
        diversion_approver: mock.clone(),
        shipment_rejecter: mock.clone(),
        cancellation_requester: mock.clone(),
        reweigh_requester: mock.clone(),
        sit_status_fetcher: mock.clone(),
        sit_extension_approver: mock.clone(),
        sit_extension_denier: mock.clone(),
        order_fetcher: mock.clone(),
        order_updater: mock.clone(),
        excess_weight_risk_manager: mock.clone(),
        report_fetcher: mock.clone(),
        report_creator: mock.clone(),
        report_updater: mock.clone(),
        report_deleter: mock.clone(),
        payment_service_item_status_updater: mock.clone(),
        customer_fetcher: mock.clone(),
        customer_updater: mock.clone(),
        customer_searcher: mock.clone(),
        document_fetcher: mock.clone(),
        upload_updater: mock.clone(),
        upload_deleter: mock,
    }
}

#[async_trait]
impl MoveFetcher for MockServices {
    async fn fetch_move(&self, _locator: &str) -> Result<Move, DomainError> {
        self.hit("fetch_move")?;
        Ok(self.fixtures.mv.clone())
    }
}

#[async_trait]
impl MoveSearcher for MockServices {
    async fn search_moves(&self, params: &SearchMovesParams) -> Result<Paged<Move>, DomainError> {
        self.hit("search_moves")?;
        *self.last_search.lock() = Some(params.clone());
        Ok(Paged {
            items: vec![self.fixtures.mv.clone()],
            total_count: 1,
            page: params.page,
            per_page: params.per_page,
        })
    }
}

#[async_trait]
impl MoveLocker for MockServices {
    async fn lock_move(
        &self,
        _move_id: Uuid,
        office_user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Move, DomainError> {
        self.hit("lock_move")?;
        let mut mv = self.fixtures.mv.clone();
        mv.locked_by_office_user_id = Some(office_user_id);
        mv.lock_expires_at = Some(expires_at);
        Ok(mv)
    }

    async fn unlock_moves_for(&self, _office_user_id: Uuid) -> Result<usize, DomainError> {
        self.hit("unlock_moves_for")?;
        Ok(0)
    }
}

#[async_trait]
impl MoveFinancialReviewFlagSetter for MockServices {
    async fn set_financial_review_flag(
        &self,
        _move_id: Uuid,
        _etag: &str,
        flag: bool,
        remarks: Option<String>,
    ) -> Result<Move, DomainError> {
        self.hit("set_financial_review_flag")?;
        let mut mv = self.fixtures.mv.clone();
        mv.financial_review_flag = flag;
        mv.financial_review_remarks = remarks;
        Ok(mv)
    }
}

#[async_trait]
impl MoveCloseoutOfficeUpdater for MockServices {
    async fn update_closeout_office(
        &self,
        _locator: &str,
        closeout_office_id: Uuid,
        _etag: &str,
    ) -> Result<Move, DomainError> {
        self.hit("update_closeout_office")?;
        let mut mv = self.fixtures.mv.clone();
        mv.closeout_office_id = Some(closeout_office_id);
        Ok(mv)
    }
}

#[async_trait]
impl MoveCanceler for MockServices {
    async fn cancel_move(&self, _move_id: Uuid) -> Result<Move, DomainError> {
        self.hit("cancel_move")?;
        let mut mv = self.fixtures.mv.clone();
        mv.status = MoveStatus::Canceled;
        Ok(mv)
    }
}

#[async_trait]
impl ShipmentFetcher for MockServices {
    async fn fetch_shipment(&self, _shipment_id: Uuid) -> Result<MtoShipment, DomainError> {
        self.hit("fetch_shipment")?;
        Ok(self.fixtures.shipment.clone())
    }

    async fn list_shipments(&self, _move_id: Uuid) -> Result<Vec<MtoShipment>, DomainError> {
        self.hit("list_shipments")?;
        Ok(self.fixtures.mv.shipments.clone())
    }
}

#[async_trait]
impl ShipmentUpdater for MockServices {
    async fn update_shipment(
        &self,
        _id: Uuid,
        _etag: &str,
        patch: ShipmentPatch,
        _roles: &[RoleType],
    ) -> Result<MtoShipment, DomainError> {
        self.hit("update_shipment")?;
        let mut shipment = self.fixtures.shipment.clone();
        if let Some(r) = patch.counselor_remarks {
            shipment.counselor_remarks = Some(r);
        }
        Ok(shipment)
    }
}

#[async_trait]
impl ShipmentDeleter for MockServices {
    async fn delete_shipment(&self, _id: Uuid) -> Result<Uuid, DomainError> {
        self.hit("delete_shipment")?;
        Ok(self.fixtures.shipment.move_task_order_id)
    }
}

#[async_trait]
impl ShipmentApprover for MockServices {
    async fn approve_shipment(&self, _id: Uuid, _etag: &str) -> Result<MtoShipment, DomainError> {
        self.hit("approve_shipment")?;
        Ok(self.fixtures.shipment.clone())
    }
}

#[async_trait]
impl ShipmentDiversionRequester for MockServices {
    async fn request_diversion(
        &self,
        _id: Uuid,
        _etag: &str,
        reason: String,
    ) -> Result<MtoShipment, DomainError> {
        self.hit("request_diversion")?;
        let mut s = self.fixtures.shipment.clone();
        s.status = ShipmentStatus::DiversionRequested;
        s.diversion = true;
        s.diversion_reason = Some(reason);
        Ok(s)
    }
}

#[async_trait]
impl ShipmentDiversionApprover for MockServices {
    async fn approve_diversion(&self, _id: Uuid, _etag: &str) -> Result<MtoShipment, DomainError> {
        self.hit("approve_diversion")?;
        Ok(self.fixtures.shipment.clone())
    }
}

#[async_trait]
impl ShipmentRejecter for MockServices {
    async fn reject_shipment(
        &self,
        _id: Uuid,
        _etag: &str,
        reason: String,
    ) -> Result<MtoShipment, DomainError> {
        self.hit("reject_shipment")?;
        let mut s = self.fixtures.shipment.clone();
        s.status = ShipmentStatus::Rejected;
        s.rejection_reason = Some(reason);
        Ok(s)
    }
}

#[async_trait]
impl ShipmentCancellationRequester for MockServices {
    async fn request_cancellation(
        &self,
        _id: Uuid,
        _etag: &str,
    ) -> Result<MtoShipment, DomainError> {
        self.hit("request_cancellation")?;
        let mut s = self.fixtures.shipment.clone();
        s.status = ShipmentStatus::CancellationRequested;
        Ok(s)
    }
}

#[async_trait]
impl ShipmentReweighRequester for MockServices {
    async fn request_reweigh(
        &self,
        shipment_id: Uuid,
        requester: ReweighRequester,
    ) -> Result<Reweigh, DomainError> {
        self.hit("request_reweigh")?;
        Ok(Reweigh {
            id: Uuid::new_v4(),
            shipment_id,
            requested_at: Utc::now(),
            requested_by: requester,
            verification_reason: None,
            weight: None,
            verification_provided_at: None,
        })
    }
}

#[async_trait]
impl ShipmentSitStatusFetcher for MockServices {
    async fn sit_status(&self, shipment: &MtoShipment) -> Result<Option<SitStatus>, DomainError> {
        self.hit("sit_status")?;
        Ok((shipment.id == self.fixtures.sit_status.shipment_id)
            .then(|| self.fixtures.sit_status.clone()))
    }
}

#[async_trait]
impl SitExtensionApprover for MockServices {
    async fn approve_sit_extension(
        &self,
        _shipment_id: Uuid,
        _sit_extension_id: Uuid,
        _approved_days: i64,
        _request_reason: Option<String>,
        _office_remarks: Option<String>,
        _etag: &str,
    ) -> Result<MtoShipment, DomainError> {
        self.hit("approve_sit_extension")?;
        Ok(self.fixtures.shipment.clone())
    }
}

#[async_trait]
impl SitExtensionDenier for MockServices {
    async fn deny_sit_extension(
        &self,
        _shipment_id: Uuid,
        _sit_extension_id: Uuid,
        _office_remarks: Option<String>,
        _convert_to_customer_expense: bool,
        _etag: &str,
    ) -> Result<MtoShipment, DomainError> {
        self.hit("deny_sit_extension")?;
        Ok(self.fixtures.shipment.clone())
    }
}

#[async_trait]
impl OrderFetcher for MockServices {
    async fn fetch_order(&self, _order_id: Uuid) -> Result<Order, DomainError> {
        self.hit("fetch_order")?;
        Ok(self.fixtures.order.clone())
    }
}

#[async_trait]
impl OrderUpdater for MockServices {
    async fn update_order_as_too(
        &self,
        _order_id: Uuid,
        _etag: &str,
        _patch: OrderPatch,
    ) -> Result<(Order, Uuid), DomainError> {
        self.hit("update_order_as_too")?;
        Ok(self.order_pair())
    }

    async fn update_order_as_counselor(
        &self,
        _order_id: Uuid,
        _etag: &str,
        _patch: CounselingOrderPatch,
    ) -> Result<(Order, Uuid), DomainError> {
        self.hit("update_order_as_counselor")?;
        Ok(self.order_pair())
    }

    async fn update_allowance_as_too(
        &self,
        _order_id: Uuid,
        _etag: &str,
        _patch: AllowancePatch,
    ) -> Result<(Order, Uuid), DomainError> {
        self.hit("update_allowance_as_too")?;
        Ok(self.order_pair())
    }

    async fn update_allowance_as_counselor(
        &self,
        _order_id: Uuid,
        _etag: &str,
        _patch: AllowancePatch,
    ) -> Result<(Order, Uuid), DomainError> {
        self.hit("update_allowance_as_counselor")?;
        Ok(self.order_pair())
    }
}

#[async_trait]
impl ExcessWeightRiskManager for MockServices {
    async fn acknowledge_excess_weight_risk(
        &self,
        _order_id: Uuid,
        _etag: &str,
    ) -> Result<Move, DomainError> {
        self.hit("acknowledge_excess_weight_risk")?;
        let mut mv = self.fixtures.mv.clone();
        mv.excess_weight_acknowledged_at = Some(Utc::now());
        Ok(mv)
    }

    async fn update_billable_weight(
        &self,
        _order_id: Uuid,
        _weight: i64,
        _etag: &str,
    ) -> Result<(Order, Uuid), DomainError> {
        self.hit("update_billable_weight")?;
        Ok(self.order_pair())
    }

    async fn update_max_billable_weight_as_tio(
        &self,
        _order_id: Uuid,
        _weight: i64,
        _remarks: String,
        _etag: &str,
    ) -> Result<(Order, Uuid), DomainError> {
        self.hit("update_max_billable_weight_as_tio")?;
        Ok(self.order_pair())
    }
}

#[async_trait]
impl EvaluationReportFetcher for MockServices {
    async fn fetch_report(
        &self,
        _report_id: Uuid,
        _office_user_id: Uuid,
    ) -> Result<EvaluationReport, DomainError> {
        self.hit("fetch_report")?;
        Ok(self.fixtures.report.clone())
    }

    async fn list_shipment_reports(
        &self,
        _move_id: Uuid,
        _office_user_id: Uuid,
    ) -> Result<Vec<EvaluationReport>, DomainError> {
        self.hit("list_shipment_reports")?;
        Ok(Vec::new())
    }

    async fn list_counseling_reports(
        &self,
        _move_id: Uuid,
        _office_user_id: Uuid,
    ) -> Result<Vec<EvaluationReport>, DomainError> {
        self.hit("list_counseling_reports")?;
        Ok(vec![self.fixtures.report.clone()])
    }
}

#[async_trait]
impl EvaluationReportCreator for MockServices {
    async fn create_report(
        &self,
        _move_locator: &str,
        report: NewEvaluationReport,
    ) -> Result<EvaluationReport, DomainError> {
        self.hit("create_report")?;
        let mut r = self.fixtures.report.clone();
        r.shipment_id = report.shipment_id;
        if report.shipment_id.is_some() {
            r.report_type = EvaluationReportType::Shipment;
        }
        Ok(r)
    }
}

#[async_trait]
impl EvaluationReportUpdater for MockServices {
    async fn update_report(
        &self,
        _report_id: Uuid,
        _office_user_id: Uuid,
        _draft: EvaluationReportDraft,
        _etag: &str,
    ) -> Result<EvaluationReport, DomainError> {
        self.hit("update_report")?;
        Ok(self.fixtures.report.clone())
    }

    async fn submit_report(
        &self,
        _report_id: Uuid,
        _office_user_id: Uuid,
        _etag: &str,
    ) -> Result<EvaluationReport, DomainError> {
        self.hit("submit_report")?;
        Ok(self.fixtures.report.clone())
    }
}

#[async_trait]
impl EvaluationReportDeleter for MockServices {
    async fn delete_report(&self, _report_id: Uuid, _office_user_id: Uuid) -> Result<(), DomainError> {
        self.hit("delete_report")
    }
}

#[async_trait]
impl PaymentServiceItemStatusUpdater for MockServices {
    async fn update_status(
        &self,
        _move_task_order_id: Uuid,
        _payment_service_item_id: Uuid,
        status: PaymentServiceItemStatus,
        rejection_reason: Option<String>,
        _etag: &str,
    ) -> Result<PaymentServiceItem, DomainError> {
        self.hit("update_payment_service_item_status")?;
        let mut item = self.fixtures.payment_service_item.clone();
        item.status = status;
        item.rejection_reason = rejection_reason;
        Ok(item)
    }
}

#[async_trait]
impl CustomerFetcher for MockServices {
    async fn fetch_customer(&self, _customer_id: Uuid) -> Result<Customer, DomainError> {
        self.hit("fetch_customer")?;
        Ok(self.fixtures.customer.clone())
    }
}

#[async_trait]
impl CustomerUpdater for MockServices {
    async fn update_customer(
        &self,
        _customer_id: Uuid,
        _patch: CustomerPatch,
        _etag: &str,
    ) -> Result<Customer, DomainError> {
        self.hit("update_customer")?;
        Ok(self.fixtures.customer.clone())
    }
}

#[async_trait]
impl CustomerSearcher for MockServices {
    async fn search_customers(
        &self,
        params: &SearchCustomersParams,
    ) -> Result<Paged<Customer>, DomainError> {
        self.hit("search_customers")?;
        Ok(Paged {
            items: vec![self.fixtures.customer.clone()],
            total_count: 1,
            page: params.page,
            per_page: params.per_page,
        })
    }
}

#[async_trait]
impl DocumentFetcher for MockServices {
    async fn fetch_document(&self, _document_id: Uuid) -> Result<Document, DomainError> {
        self.hit("fetch_document")?;
        Ok(self.fixtures.document.clone())
    }
}

#[async_trait]
impl UploadUpdater for MockServices {
    async fn update_rotation(&self, _upload_id: Uuid, rotation: i64) -> Result<Upload, DomainError> {
        self.hit("update_rotation")?;
        let mut u = self.fixtures.document.uploads[0].clone();
        u.rotation = Some(rotation);
        Ok(u)
    }
}

#[async_trait]
impl UploadDeleter for MockServices {
    async fn delete_upload(&self, _upload_id: Uuid) -> Result<(), DomainError> {
        self.hit("delete_upload")
    }
}

// ----- side-effect sinks -----

#[derive(Default)]
pub struct RecordingAudit {
    pub calls: AtomicUsize,
    pub records: Mutex<Vec<AuditRecord>>,
    pub fail: bool,
}

#[async_trait]
impl AuditCapture for RecordingAudit {
    async fn capture(&self, record: &AuditRecord) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DomainError::unexpected("audit store offline"));
        }
        self.records.lock().push(record.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEvents {
    pub calls: AtomicUsize,
    pub events: Mutex<Vec<Event>>,
    pub fail: bool,
}

#[async_trait]
impl EventTrigger for RecordingEvents {
    async fn trigger(&self, event: &Event) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DomainError::unexpected("notification queue offline"));
        }
        self.events.lock().push(event.clone());
        Ok(())
    }
}

// ----- harness -----

pub struct Harness {
    pub mock: Arc<MockServices>,
    pub audit: Arc<RecordingAudit>,
    pub events: Arc<RecordingEvents>,
    pub state: Arc<ApiState>,
    router: Router,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(false)
    }

    /// Audit capture and event trigger both fail on every call.
    pub fn with_failing_side_effects() -> Self {
        Self::build(true)
    }

    fn build(fail_side_effects: bool) -> Self {
        let mock = Arc::new(MockServices::new());
        let audit = Arc::new(RecordingAudit {
            fail: fail_side_effects,
            ..Default::default()
        });
        let events = Arc::new(RecordingEvents {
            fail: fail_side_effects,
            ..Default::default()
        });
        let storer = Arc::new(LocalFileStorer::new("http://files.test", "secret", 900).unwrap());
        let state = Arc::new(ApiState {
            services: services_from(mock.clone()),
            storer,
            emitter: Emitter::new(audit.clone(), events.clone()),
            config: GhcApiConfig::default(),
        });
        let router = routes::router(state.clone(), Arc::new(StaticSessionResolver::default()));
        Self {
            mock,
            audit,
            events,
            state,
            router,
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn audit_calls(&self) -> usize {
        self.audit.calls.load(Ordering::SeqCst)
    }

    pub fn event_calls(&self) -> usize {
        self.events.calls.load(Ordering::SeqCst)
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        send(self.router(), req).await
    }
}

/// The module wired to its in-memory services over the demo seed.
pub struct Live {
    pub api: GhcApi,
    router: Router,
}

impl Live {
    pub fn new() -> Self {
        let api = GhcApi::from_config(GhcApiConfig::default()).unwrap();
        let router = api.router();
        Self { api, router }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        send(self.router.clone(), req).await
    }

    /// Current `eTag` of the resource at `path`.
    pub async fn etag(&self, path: &str, session: Session) -> String {
        let resp = self.send(request(Method::GET, url(path)).session(session).build()).await;
        assert_eq!(resp.status, StatusCode::OK, "GET {path}");
        resp.json()["eTag"].as_str().unwrap().to_string()
    }
}

/// Context for calling a handler function directly.
pub fn ctx(session: Session, method: Method, path: &str) -> AppContext {
    AppContext::new(session, method, path)
}

// ----- requests -----

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

pub async fn send(router: Router, req: Request<Body>) -> TestResponse {
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub struct RequestBuilder {
    method: Method,
    uri: String,
    session: Option<Session>,
    if_match: Option<String>,
    headers: Vec<(&'static str, String)>,
    body: Option<Value>,
}

pub fn request(method: Method, uri: impl Into<String>) -> RequestBuilder {
    RequestBuilder {
        method,
        uri: uri.into(),
        session: None,
        if_match: None,
        headers: Vec::new(),
        body: None,
    }
}

impl RequestBuilder {
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn if_match(mut self, token: impl Into<String>) -> Self {
        self.if_match = Some(token.into());
        self
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn build(self) -> Request<Body> {
        let mut b = Request::builder().method(self.method).uri(self.uri);
        if let Some(s) = self.session {
            b = b.extension(s);
        }
        if let Some(tag) = self.if_match {
            b = b.header(header::IF_MATCH, tag);
        }
        for (name, value) in self.headers {
            b = b.header(name, value);
        }
        match self.body {
            Some(v) => b
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&v).unwrap()))
                .unwrap(),
            None => b.body(Body::empty()).unwrap(),
        }
    }
}

pub const BASE: &str = "/ghc/v1";

pub fn url(path: &str) -> String {
    format!("{BASE}{path}")
}
