use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ----- moves -----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum MoveStatus {
    #[serde(rename = "DRAFT")]
    Draft,
    #[serde(rename = "NEEDS SERVICE COUNSELING")]
    NeedsServiceCounseling,
    #[serde(rename = "SERVICE COUNSELING COMPLETED")]
    ServiceCounselingCompleted,
    #[serde(rename = "SUBMITTED")]
    Submitted,
    #[serde(rename = "APPROVALS REQUESTED")]
    ApprovalsRequested,
    #[serde(rename = "APPROVED")]
    Approved,
    #[serde(rename = "CANCELED")]
    Canceled,
}

/// A move. `orders`, `additional_documents` and `shipments` are populated by
/// the service layer on read.
#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    pub id: Uuid,
    pub locator: String,
    pub status: MoveStatus,
    pub orders_id: Uuid,
    pub orders: Option<Order>,
    pub reference_id: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub available_to_prime_at: Option<DateTime<Utc>>,
    pub excess_weight_qualified_at: Option<DateTime<Utc>>,
    pub excess_weight_acknowledged_at: Option<DateTime<Utc>>,
    pub billable_weights_reviewed_at: Option<DateTime<Utc>>,
    pub tio_remarks: Option<String>,
    pub financial_review_flag: bool,
    pub financial_review_remarks: Option<String>,
    pub closeout_office_id: Option<Uuid>,
    pub locked_by_office_user_id: Option<Uuid>,
    pub lock_expires_at: Option<DateTime<Utc>>,
    pub additional_documents_id: Option<Uuid>,
    pub additional_documents: Option<Document>,
    pub shipments: Vec<MtoShipment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Move {
    /// A lock is live while it has a holder and has not expired.
    pub fn has_live_lock(&self, now: DateTime<Utc>) -> bool {
        self.locked_by_office_user_id.is_some() && self.lock_expires_at.is_some_and(|t| t > now)
    }

    pub fn orders_type(&self) -> Option<OrdersType> {
        self.orders.as_ref().map(|o| o.orders_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchMovesParams {
    pub locator: Option<String>,
    pub dod_id: Option<String>,
    pub emplid: Option<String>,
    pub customer_name: Option<String>,
    pub branch: Option<String>,
    pub status: Vec<MoveStatus>,
    pub origin_postal_code: Option<String>,
    pub destination_postal_code: Option<String>,
    pub shipments_count: Option<i64>,
    pub page: u32,
    pub per_page: u32,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

/// One page of results plus the unpaginated total.
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub per_page: u32,
}

// ----- orders -----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrdersType {
    PermanentChangeOfStation,
    LocalMove,
    Retirement,
    Separation,
    TemporaryDuty,
    Safety,
    Bluebark,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DutyLocation {
    pub id: Uuid,
    pub name: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entitlement {
    pub id: Uuid,
    pub authorized_weight: Option<i64>,
    pub dependents_authorized: Option<bool>,
    pub non_temporary_storage: Option<bool>,
    pub privately_owned_vehicle: Option<bool>,
    pub pro_gear_weight: i64,
    pub pro_gear_weight_spouse: i64,
    pub required_medical_equipment_weight: i64,
    pub organizational_clothing_and_individual_equipment: bool,
    pub gun_safe: bool,
    pub storage_in_transit: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

/// Orders. `customer` and the move fields are populated on read.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer: Option<Customer>,
    pub orders_number: Option<String>,
    pub orders_type: OrdersType,
    pub orders_type_detail: Option<String>,
    pub grade: Option<String>,
    pub issue_date: NaiveDate,
    pub report_by_date: NaiveDate,
    pub department_indicator: Option<String>,
    pub tac: Option<String>,
    pub sac: Option<String>,
    pub nts_tac: Option<String>,
    pub nts_sac: Option<String>,
    pub origin_duty_location: Option<DutyLocation>,
    pub new_duty_location: DutyLocation,
    pub entitlement: Option<Entitlement>,
    pub move_code: Option<String>,
    pub move_task_order_id: Option<Uuid>,
    pub amended_orders_acknowledged_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order fields a TOO/TIO may change.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPatch {
    pub issue_date: NaiveDate,
    pub report_by_date: NaiveDate,
    pub orders_type: OrdersType,
    pub orders_type_detail: Option<String>,
    pub orders_number: Option<String>,
    pub grade: Option<String>,
    pub department_indicator: Option<String>,
    pub tac: Option<String>,
    pub sac: Option<String>,
    pub nts_tac: Option<String>,
    pub nts_sac: Option<String>,
}

/// Order fields a services counselor may change.
#[derive(Debug, Clone, PartialEq)]
pub struct CounselingOrderPatch {
    pub issue_date: NaiveDate,
    pub report_by_date: NaiveDate,
    pub orders_type: OrdersType,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllowancePatch {
    pub grade: Option<String>,
    pub dependents_authorized: Option<bool>,
    pub pro_gear_weight: Option<i64>,
    pub pro_gear_weight_spouse: Option<i64>,
    pub required_medical_equipment_weight: Option<i64>,
    pub organizational_clothing_and_individual_equipment: Option<bool>,
    pub storage_in_transit: Option<i64>,
    pub gun_safe: Option<bool>,
}

// ----- shipments -----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
    CancellationRequested,
    Canceled,
    DiversionRequested,
    ApprovalsRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ShipmentType {
    #[serde(rename = "HHG")]
    Hhg,
    #[serde(rename = "HHG_INTO_NTS")]
    HhgIntoNts,
    #[serde(rename = "HHG_OUTOF_NTS")]
    HhgOutOfNts,
    #[serde(rename = "PPM")]
    Ppm,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub id: Uuid,
    pub street_address1: String,
    pub street_address2: Option<String>,
    pub street_address3: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SitExtensionStatus {
    Pending,
    Approved,
    Denied,
    Removed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitExtension {
    pub id: Uuid,
    pub mto_shipment_id: Uuid,
    pub request_reason: String,
    pub requested_days: i64,
    pub status: SitExtensionStatus,
    pub approved_days: Option<i64>,
    pub contractor_remarks: Option<String>,
    pub office_remarks: Option<String>,
    pub decision_date: Option<DateTime<Utc>>,
    pub customer_expense: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSit {
    pub service_item_id: Uuid,
    pub location: String,
    pub days_in_sit: i64,
    pub sit_entry_date: NaiveDate,
    pub sit_departure_date: Option<NaiveDate>,
    pub sit_authorized_end_date: NaiveDate,
    pub sit_customer_contacted: Option<NaiveDate>,
    pub sit_requested_delivery: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitStatus {
    pub shipment_id: Uuid,
    pub total_sit_days_used: i64,
    pub total_days_remaining: i64,
    pub calculated_total_days_in_sit: i64,
    pub current_sit: Option<CurrentSit>,
}

impl SitStatus {
    /// Re-derive the allowance-dependent fields from the days already used.
    /// The authorized end date moves with the allowance; it stays put when
    /// the shift cannot be represented.
    pub fn against_allowance(mut self, allowance: i64) -> Self {
        self.total_days_remaining = allowance.saturating_sub(self.total_sit_days_used);
        let used_before = self.total_sit_days_used;
        if let Some(current) = self.current_sit.as_mut() {
            let prior = used_before.saturating_sub(current.days_in_sit);
            if let Some(end) = chrono::Duration::try_days(allowance.saturating_sub(prior))
                .and_then(|d| current.sit_entry_date.checked_add_signed(d))
            {
                current.sit_authorized_end_date = end;
            }
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReweighRequester {
    Customer,
    Prime,
    System,
    Too,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reweigh {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub requested_at: DateTime<Utc>,
    pub requested_by: ReweighRequester,
    pub verification_reason: Option<String>,
    pub weight: Option<i64>,
    pub verification_provided_at: Option<DateTime<Utc>>,
}

/// Shipment with its SIT extensions (creation order) and reweigh request.
#[derive(Debug, Clone, PartialEq)]
pub struct MtoShipment {
    pub id: Uuid,
    pub move_task_order_id: Uuid,
    pub shipment_type: ShipmentType,
    pub status: ShipmentStatus,
    pub shipment_locator: Option<String>,
    pub requested_pickup_date: Option<NaiveDate>,
    pub requested_delivery_date: Option<NaiveDate>,
    pub scheduled_pickup_date: Option<NaiveDate>,
    pub scheduled_delivery_date: Option<NaiveDate>,
    pub actual_pickup_date: Option<NaiveDate>,
    pub actual_delivery_date: Option<NaiveDate>,
    pub approved_date: Option<DateTime<Utc>>,
    pub pickup_address: Option<Address>,
    pub destination_address: Option<Address>,
    pub secondary_pickup_address: Option<Address>,
    pub secondary_delivery_address: Option<Address>,
    pub customer_remarks: Option<String>,
    pub counselor_remarks: Option<String>,
    pub rejection_reason: Option<String>,
    pub diversion: bool,
    pub diversion_reason: Option<String>,
    pub prime_estimated_weight: Option<i64>,
    pub prime_actual_weight: Option<i64>,
    pub billable_weight_cap: Option<i64>,
    pub billable_weight_justification: Option<String>,
    pub sit_days_allowance: Option<i64>,
    pub sit_extensions: Vec<SitExtension>,
    pub reweigh: Option<Reweigh>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Address as typed by an office user; ids and timestamps are assigned on save.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressFields {
    pub street_address1: String,
    pub street_address2: Option<String>,
    pub street_address3: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: Option<String>,
}

/// Shipment fields an office user may edit. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipmentPatch {
    pub requested_pickup_date: Option<NaiveDate>,
    pub requested_delivery_date: Option<NaiveDate>,
    pub scheduled_pickup_date: Option<NaiveDate>,
    pub pickup_address: Option<AddressFields>,
    pub destination_address: Option<AddressFields>,
    pub customer_remarks: Option<String>,
    pub counselor_remarks: Option<String>,
    pub billable_weight_cap: Option<i64>,
    pub billable_weight_justification: Option<String>,
}

// ----- evaluation reports -----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationReportType {
    Shipment,
    Counseling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionType {
    DataReview,
    Physical,
    Virtual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationReportLocation {
    Origin,
    Destination,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OfficeUserRef {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub id: Uuid,
    pub move_id: Uuid,
    pub move_reference_id: Option<String>,
    pub shipment_id: Option<Uuid>,
    pub report_type: EvaluationReportType,
    pub office_user: OfficeUserRef,
    pub inspection_date: Option<NaiveDate>,
    pub inspection_type: Option<InspectionType>,
    pub location: Option<EvaluationReportLocation>,
    pub location_description: Option<String>,
    pub observed_shipment_delivery_date: Option<NaiveDate>,
    pub observed_shipment_physical_pickup_date: Option<NaiveDate>,
    pub time_depart: Option<NaiveTime>,
    pub eval_start: Option<NaiveTime>,
    pub eval_end: Option<NaiveTime>,
    pub violations_observed: Option<bool>,
    pub remarks: Option<String>,
    pub serious_incident: Option<bool>,
    pub serious_incident_desc: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEvaluationReport {
    pub shipment_id: Option<Uuid>,
    pub office_user_id: Uuid,
}

/// Editable fields of a draft report; replaces the stored values wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationReportDraft {
    pub inspection_date: Option<NaiveDate>,
    pub inspection_type: Option<InspectionType>,
    pub location: Option<EvaluationReportLocation>,
    pub location_description: Option<String>,
    pub observed_shipment_delivery_date: Option<NaiveDate>,
    pub observed_shipment_physical_pickup_date: Option<NaiveDate>,
    pub time_depart: Option<NaiveTime>,
    pub eval_start: Option<NaiveTime>,
    pub eval_end: Option<NaiveTime>,
    pub violations_observed: Option<bool>,
    pub remarks: Option<String>,
    pub serious_incident: Option<bool>,
    pub serious_incident_desc: Option<String>,
}

// ----- payment service items -----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentServiceItemStatus {
    Requested,
    Approved,
    Denied,
    SentToGex,
    ReceivedByGex,
    Paid,
    EdiError,
}

impl PaymentServiceItemStatus {
    /// Statuses an office user may set directly.
    pub const REVIEWABLE: [PaymentServiceItemStatus; 3] = [
        PaymentServiceItemStatus::Requested,
        PaymentServiceItemStatus::Approved,
        PaymentServiceItemStatus::Denied,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Approved => "APPROVED",
            Self::Denied => "DENIED",
            Self::SentToGex => "SENT_TO_GEX",
            Self::ReceivedByGex => "RECEIVED_BY_GEX",
            Self::Paid => "PAID",
            Self::EdiError => "EDI_ERROR",
        }
    }

    /// Parse one of the reviewable statuses.
    pub fn parse_reviewable(raw: &str) -> Option<Self> {
        Self::REVIEWABLE.into_iter().find(|s| s.as_str() == raw)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentServiceItem {
    pub id: Uuid,
    pub move_task_order_id: Uuid,
    pub mto_service_item_id: Uuid,
    pub mto_service_item_code: String,
    pub mto_service_item_name: String,
    pub mto_shipment_id: Option<Uuid>,
    pub price_cents: Option<i64>,
    pub rejection_reason: Option<String>,
    pub status: PaymentServiceItemStatus,
    pub reference_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ----- customers -----

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub suffix: Option<String>,
    pub affiliation: Option<String>,
    pub edipi: Option<String>,
    pub emplid: Option<String>,
    pub personal_email: Option<String>,
    pub telephone: Option<String>,
    pub secondary_telephone: Option<String>,
    pub phone_is_preferred: bool,
    pub email_is_preferred: bool,
    pub residential_address: Option<Address>,
    pub backup_mailing_address: Option<Address>,
    pub cac_validated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerPatch {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub suffix: Option<String>,
    pub personal_email: Option<String>,
    pub telephone: Option<String>,
    pub secondary_telephone: Option<String>,
    pub phone_is_preferred: Option<bool>,
    pub email_is_preferred: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCustomersParams {
    pub branch: Option<String>,
    pub dod_id: Option<String>,
    pub emplid: Option<String>,
    pub customer_name: Option<String>,
    pub page: u32,
    pub per_page: u32,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

// ----- documents -----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadType {
    User,
    Prime,
    Office,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub upload_type: UploadType,
    pub bytes: i64,
    pub rotation: Option<i64>,
    pub storage_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A document with its live (non-deleted) uploads in upload order.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub service_member_id: Uuid,
    pub uploads: Vec<Upload>,
}

/// Tags attached to a stored object (e.g. `av-status`).
pub type ObjectTags = HashMap<String, String>;
