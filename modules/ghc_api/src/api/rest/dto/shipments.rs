use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{address, tag, AddressDto};
use crate::contract::model::{
    AddressFields, CurrentSit, MtoShipment, Reweigh, ReweighRequester, ShipmentPatch,
    ShipmentStatus, ShipmentType, SitExtension, SitExtensionStatus, SitStatus,
};
use crate::domain::error::{DomainError, FieldErrors};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SitExtensionDto {
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
    pub e_tag: String,
}

impl From<&SitExtension> for SitExtensionDto {
    fn from(s: &SitExtension) -> Self {
        Self {
            id: s.id,
            mto_shipment_id: s.mto_shipment_id,
            request_reason: s.request_reason.clone(),
            requested_days: s.requested_days,
            status: s.status,
            approved_days: s.approved_days,
            contractor_remarks: s.contractor_remarks.clone(),
            office_remarks: s.office_remarks.clone(),
            decision_date: s.decision_date,
            customer_expense: s.customer_expense,
            created_at: s.created_at,
            e_tag: tag(s.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSitDto {
    pub service_item_id: Uuid,
    pub location: String,
    pub days_in_sit: i64,
    pub sit_entry_date: NaiveDate,
    pub sit_departure_date: Option<NaiveDate>,
    pub sit_authorized_end_date: NaiveDate,
    pub sit_customer_contacted: Option<NaiveDate>,
    pub sit_requested_delivery: Option<NaiveDate>,
}

impl From<&CurrentSit> for CurrentSitDto {
    fn from(c: &CurrentSit) -> Self {
        Self {
            service_item_id: c.service_item_id,
            location: c.location.clone(),
            days_in_sit: c.days_in_sit,
            sit_entry_date: c.sit_entry_date,
            sit_departure_date: c.sit_departure_date,
            sit_authorized_end_date: c.sit_authorized_end_date,
            sit_customer_contacted: c.sit_customer_contacted,
            sit_requested_delivery: c.sit_requested_delivery,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SitStatusDto {
    pub total_sit_days_used: i64,
    pub total_days_remaining: i64,
    pub calculated_total_days_in_sit: i64,
    pub current_sit: Option<CurrentSitDto>,
}

impl From<&SitStatus> for SitStatusDto {
    fn from(s: &SitStatus) -> Self {
        Self {
            total_sit_days_used: s.total_sit_days_used,
            total_days_remaining: s.total_days_remaining,
            calculated_total_days_in_sit: s.calculated_total_days_in_sit,
            current_sit: s.current_sit.as_ref().map(CurrentSitDto::from),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReweighDto {
    pub id: Uuid,
    pub shipment_id: Uuid,
    pub requested_at: DateTime<Utc>,
    pub requested_by: ReweighRequester,
    pub verification_reason: Option<String>,
    pub weight: Option<i64>,
    pub verification_provided_at: Option<DateTime<Utc>>,
}

impl From<&Reweigh> for ReweighDto {
    fn from(r: &Reweigh) -> Self {
        Self {
            id: r.id,
            shipment_id: r.shipment_id,
            requested_at: r.requested_at,
            requested_by: r.requested_by,
            verification_reason: r.verification_reason.clone(),
            weight: r.weight,
            verification_provided_at: r.verification_provided_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MtoShipmentDto {
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
    pub pickup_address: Option<AddressDto>,
    pub destination_address: Option<AddressDto>,
    pub secondary_pickup_address: Option<AddressDto>,
    pub secondary_delivery_address: Option<AddressDto>,
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
    pub sit_extensions: Vec<SitExtensionDto>,
    pub sit_status: Option<SitStatusDto>,
    pub reweigh: Option<ReweighDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub e_tag: String,
}

impl MtoShipmentDto {
    /// Map a shipment with its SIT summary.
    pub fn build(s: &MtoShipment, sit_status: Option<&SitStatus>) -> Self {
        Self {
            id: s.id,
            move_task_order_id: s.move_task_order_id,
            shipment_type: s.shipment_type,
            status: s.status,
            shipment_locator: s.shipment_locator.clone(),
            requested_pickup_date: s.requested_pickup_date,
            requested_delivery_date: s.requested_delivery_date,
            scheduled_pickup_date: s.scheduled_pickup_date,
            scheduled_delivery_date: s.scheduled_delivery_date,
            actual_pickup_date: s.actual_pickup_date,
            actual_delivery_date: s.actual_delivery_date,
            approved_date: s.approved_date,
            pickup_address: address(s.pickup_address.as_ref()),
            destination_address: address(s.destination_address.as_ref()),
            secondary_pickup_address: address(s.secondary_pickup_address.as_ref()),
            secondary_delivery_address: address(s.secondary_delivery_address.as_ref()),
            customer_remarks: s.customer_remarks.clone(),
            counselor_remarks: s.counselor_remarks.clone(),
            rejection_reason: s.rejection_reason.clone(),
            diversion: s.diversion,
            diversion_reason: s.diversion_reason.clone(),
            prime_estimated_weight: s.prime_estimated_weight,
            prime_actual_weight: s.prime_actual_weight,
            billable_weight_cap: s.billable_weight_cap,
            billable_weight_justification: s.billable_weight_justification.clone(),
            sit_days_allowance: s.sit_days_allowance,
            sit_extensions: s.sit_extensions.iter().map(SitExtensionDto::from).collect(),
            sit_status: sit_status.map(SitStatusDto::from),
            reweigh: s.reweigh.as_ref().map(ReweighDto::from),
            created_at: s.created_at,
            updated_at: s.updated_at,
            e_tag: tag(s.updated_at),
        }
    }
}

fn required_text(field: &str, value: Option<String>) -> Result<String, DomainError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DomainError::invalid_field(field, "is required"))
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestDiversionReq {
    pub diversion_reason: Option<String>,
}

impl RequestDiversionReq {
    pub fn reason(self) -> Result<String, DomainError> {
        required_text("diversionReason", self.diversion_reason)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectShipmentReq {
    pub rejection_reason: Option<String>,
}

impl RejectShipmentReq {
    pub fn reason(self) -> Result<String, DomainError> {
        required_text("rejectionReason", self.rejection_reason)
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveSitExtensionReq {
    pub approved_days: Option<i64>,
    pub request_reason: Option<String>,
    pub office_remarks: Option<String>,
}

/// Longest single SIT extension an office user may grant.
pub const MAX_SIT_EXTENSION_DAYS: i64 = 365;

impl ApproveSitExtensionReq {
    pub fn approved_days(&self) -> Result<i64, DomainError> {
        match self.approved_days {
            Some(d) if d > MAX_SIT_EXTENSION_DAYS => Err(DomainError::invalid_field(
                "approvedDays",
                format!("must be at most {MAX_SIT_EXTENSION_DAYS}"),
            )),
            Some(d) if d > 0 => Ok(d),
            Some(_) => Err(DomainError::invalid_field("approvedDays", "must be positive")),
            None => Err(DomainError::invalid_field("approvedDays", "is required")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DenySitExtensionReq {
    pub office_remarks: Option<String>,
    pub convert_to_customer_expense: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressReq {
    pub street_address1: Option<String>,
    pub street_address2: Option<String>,
    pub street_address3: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl AddressReq {
    fn into_fields(self, prefix: &str, errs: &mut FieldErrors) -> Option<AddressFields> {
        let mut take = |value: Option<String>, name: &str| {
            let value = value.filter(|v| !v.trim().is_empty());
            if value.is_none() {
                errs.add(format!("{prefix}.{name}"), "is required");
            }
            value
        };
        let street_address1 = take(self.street_address1, "streetAddress1");
        let city = take(self.city, "city");
        let state = take(self.state, "state");
        let postal_code = take(self.postal_code, "postalCode");
        Some(AddressFields {
            street_address1: street_address1?,
            street_address2: self.street_address2,
            street_address3: self.street_address3,
            city: city?,
            state: state?,
            postal_code: postal_code?,
            country: self.country,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShipmentReq {
    pub requested_pickup_date: Option<NaiveDate>,
    pub requested_delivery_date: Option<NaiveDate>,
    pub scheduled_pickup_date: Option<NaiveDate>,
    pub pickup_address: Option<AddressReq>,
    pub destination_address: Option<AddressReq>,
    pub customer_remarks: Option<String>,
    pub counselor_remarks: Option<String>,
    pub billable_weight_cap: Option<i64>,
    pub billable_weight_justification: Option<String>,
}

impl UpdateShipmentReq {
    pub fn into_patch(self) -> Result<ShipmentPatch, DomainError> {
        let mut errs = FieldErrors::new();
        if let Some(cap) = self.billable_weight_cap {
            errs.check(cap > 0, "billableWeightCap", "must be positive");
        }
        if let (Some(pickup), Some(delivery)) =
            (self.requested_pickup_date, self.requested_delivery_date)
        {
            errs.check(
                delivery >= pickup,
                "requestedDeliveryDate",
                "must not be before the requested pickup date",
            );
        }
        let pickup_address = self
            .pickup_address
            .and_then(|a| a.into_fields("pickupAddress", &mut errs));
        let destination_address = self
            .destination_address
            .and_then(|a| a.into_fields("destinationAddress", &mut errs));
        errs.into_result()?;
        Ok(ShipmentPatch {
            requested_pickup_date: self.requested_pickup_date,
            requested_delivery_date: self.requested_delivery_date,
            scheduled_pickup_date: self.scheduled_pickup_date,
            pickup_address,
            destination_address,
            customer_remarks: self.customer_remarks,
            counselor_remarks: self.counselor_remarks,
            billable_weight_cap: self.billable_weight_cap,
            billable_weight_justification: self.billable_weight_justification,
        })
    }
}
