use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{tag, AddressDto};
use super::customers::CustomerDto;
use crate::contract::model::{
    AllowancePatch, CounselingOrderPatch, DutyLocation, Entitlement, Order, OrderPatch,
    OrdersType,
};
use crate::domain::error::{DomainError, FieldErrors};

const MAX_PRO_GEAR_WEIGHT: i64 = 2000;
const MAX_SPOUSE_PRO_GEAR_WEIGHT: i64 = 500;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DutyLocationDto {
    pub id: Uuid,
    pub name: String,
    pub address: AddressDto,
}

impl From<&DutyLocation> for DutyLocationDto {
    fn from(d: &DutyLocation) -> Self {
        Self {
            id: d.id,
            name: d.name.clone(),
            address: AddressDto::from(&d.address),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementDto {
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
    pub e_tag: String,
}

impl From<&Entitlement> for EntitlementDto {
    fn from(e: &Entitlement) -> Self {
        Self {
            id: e.id,
            authorized_weight: e.authorized_weight,
            dependents_authorized: e.dependents_authorized,
            non_temporary_storage: e.non_temporary_storage,
            privately_owned_vehicle: e.privately_owned_vehicle,
            pro_gear_weight: e.pro_gear_weight,
            pro_gear_weight_spouse: e.pro_gear_weight_spouse,
            required_medical_equipment_weight: e.required_medical_equipment_weight,
            organizational_clothing_and_individual_equipment: e
                .organizational_clothing_and_individual_equipment,
            gun_safe: e.gun_safe,
            storage_in_transit: e.storage_in_transit,
            e_tag: tag(e.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer: Option<CustomerDto>,
    pub order_number: Option<String>,
    pub order_type: OrdersType,
    pub order_type_detail: Option<String>,
    pub grade: Option<String>,
    pub date_issued: NaiveDate,
    pub report_by_date: NaiveDate,
    pub department_indicator: Option<String>,
    pub tac: Option<String>,
    pub sac: Option<String>,
    pub nts_tac: Option<String>,
    pub nts_sac: Option<String>,
    pub origin_duty_location: Option<DutyLocationDto>,
    pub destination_duty_location: DutyLocationDto,
    pub entitlement: Option<EntitlementDto>,
    pub move_code: Option<String>,
    pub move_task_order_id: Option<Uuid>,
    pub amended_orders_acknowledged_at: Option<DateTime<Utc>>,
    pub e_tag: String,
}

impl From<&Order> for OrderDto {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id,
            customer_id: o.customer_id,
            customer: o.customer.as_ref().map(CustomerDto::from),
            order_number: o.orders_number.clone(),
            order_type: o.orders_type,
            order_type_detail: o.orders_type_detail.clone(),
            grade: o.grade.clone(),
            date_issued: o.issue_date,
            report_by_date: o.report_by_date,
            department_indicator: o.department_indicator.clone(),
            tac: o.tac.clone(),
            sac: o.sac.clone(),
            nts_tac: o.nts_tac.clone(),
            nts_sac: o.nts_sac.clone(),
            origin_duty_location: o.origin_duty_location.as_ref().map(DutyLocationDto::from),
            destination_duty_location: DutyLocationDto::from(&o.new_duty_location),
            entitlement: o.entitlement.as_ref().map(EntitlementDto::from),
            move_code: o.move_code.clone(),
            move_task_order_id: o.move_task_order_id,
            amended_orders_acknowledged_at: o.amended_orders_acknowledged_at,
            e_tag: tag(o.updated_at),
        }
    }
}

fn check_tac(errs: &mut FieldErrors, field: &str, tac: Option<&String>) {
    if let Some(t) = tac {
        errs.check(t.chars().count() == 4, field, "must be exactly 4 characters");
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderReq {
    pub issue_date: Option<NaiveDate>,
    pub report_by_date: Option<NaiveDate>,
    pub orders_type: Option<OrdersType>,
    pub orders_type_detail: Option<String>,
    pub orders_number: Option<String>,
    pub grade: Option<String>,
    pub department_indicator: Option<String>,
    pub tac: Option<String>,
    pub sac: Option<String>,
    pub nts_tac: Option<String>,
    pub nts_sac: Option<String>,
}

impl UpdateOrderReq {
    pub fn into_patch(self) -> Result<OrderPatch, DomainError> {
        let mut errs = FieldErrors::new();
        let issue_date = errs.required(self.issue_date, "issueDate");
        let report_by_date = errs.required(self.report_by_date, "reportByDate");
        let orders_type = errs.required(self.orders_type, "ordersType");
        check_tac(&mut errs, "tac", self.tac.as_ref());
        check_tac(&mut errs, "ntsTac", self.nts_tac.as_ref());
        match (issue_date, report_by_date, orders_type) {
            (Some(issue_date), Some(report_by_date), Some(orders_type)) if errs.is_empty() => Ok(OrderPatch {
                issue_date,
                report_by_date,
                orders_type,
                orders_type_detail: self.orders_type_detail,
                orders_number: self.orders_number,
                grade: self.grade,
                department_indicator: self.department_indicator,
                tac: self.tac,
                sac: self.sac,
                nts_tac: self.nts_tac,
                nts_sac: self.nts_sac,
            }),
            _ => Err(errs.into_error()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CounselingUpdateOrderReq {
    pub issue_date: Option<NaiveDate>,
    pub report_by_date: Option<NaiveDate>,
    pub orders_type: Option<OrdersType>,
    pub grade: Option<String>,
}

impl CounselingUpdateOrderReq {
    pub fn into_patch(self) -> Result<CounselingOrderPatch, DomainError> {
        let mut errs = FieldErrors::new();
        let issue_date = errs.required(self.issue_date, "issueDate");
        let report_by_date = errs.required(self.report_by_date, "reportByDate");
        let orders_type = errs.required(self.orders_type, "ordersType");
        match (issue_date, report_by_date, orders_type) {
            (Some(issue_date), Some(report_by_date), Some(orders_type)) => {
                Ok(CounselingOrderPatch {
                    issue_date,
                    report_by_date,
                    orders_type,
                    grade: self.grade,
                })
            }
            _ => Err(errs.into_error()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAllowanceReq {
    pub grade: Option<String>,
    pub dependents_authorized: Option<bool>,
    pub pro_gear_weight: Option<i64>,
    pub pro_gear_weight_spouse: Option<i64>,
    pub required_medical_equipment_weight: Option<i64>,
    pub organizational_clothing_and_individual_equipment: Option<bool>,
    pub storage_in_transit: Option<i64>,
    pub gun_safe: Option<bool>,
}

impl UpdateAllowanceReq {
    pub fn into_patch(self) -> Result<AllowancePatch, DomainError> {
        let mut errs = FieldErrors::new();
        if let Some(w) = self.pro_gear_weight {
            errs.check(
                (0..=MAX_PRO_GEAR_WEIGHT).contains(&w),
                "proGearWeight",
                "must be between 0 and 2000",
            );
        }
        if let Some(w) = self.pro_gear_weight_spouse {
            errs.check(
                (0..=MAX_SPOUSE_PRO_GEAR_WEIGHT).contains(&w),
                "proGearWeightSpouse",
                "must be between 0 and 500",
            );
        }
        if let Some(w) = self.required_medical_equipment_weight {
            errs.check(w >= 0, "requiredMedicalEquipmentWeight", "must not be negative");
        }
        if let Some(d) = self.storage_in_transit {
            errs.check(d >= 0, "storageInTransit", "must not be negative");
        }
        errs.into_result()?;
        Ok(AllowancePatch {
            grade: self.grade,
            dependents_authorized: self.dependents_authorized,
            pro_gear_weight: self.pro_gear_weight,
            pro_gear_weight_spouse: self.pro_gear_weight_spouse,
            required_medical_equipment_weight: self.required_medical_equipment_weight,
            organizational_clothing_and_individual_equipment: self
                .organizational_clothing_and_individual_equipment,
            storage_in_transit: self.storage_in_transit,
            gun_safe: self.gun_safe,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBillableWeightReq {
    pub authorized_weight: Option<i64>,
}

impl UpdateBillableWeightReq {
    pub fn weight(&self) -> Result<i64, DomainError> {
        match self.authorized_weight {
            Some(w) if w > 0 => Ok(w),
            Some(_) => Err(DomainError::invalid_field("authorizedWeight", "must be positive")),
            None => Err(DomainError::invalid_field("authorizedWeight", "is required")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaxBillableWeightAsTioReq {
    pub authorized_weight: Option<i64>,
    pub tio_remarks: Option<String>,
}

impl UpdateMaxBillableWeightAsTioReq {
    pub fn into_parts(self) -> Result<(i64, String), DomainError> {
        let mut errs = FieldErrors::new();
        let weight = self.authorized_weight.filter(|w| *w > 0);
        errs.check(weight.is_some(), "authorizedWeight", "is required and must be positive");
        let remarks = self.tio_remarks.filter(|r| !r.trim().is_empty());
        errs.check(remarks.is_some(), "tioRemarks", "is required");
        match (weight, remarks) {
            (Some(w), Some(r)) => Ok((w, r)),
            _ => Err(errs.into_error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_update_requires_dates_and_type() {
        let err = UpdateOrderReq::default().into_patch().unwrap_err();
        let f = err.fields().unwrap();
        assert!(f.contains_key("issueDate"));
        assert!(f.contains_key("reportByDate"));
        assert!(f.contains_key("ordersType"));
    }

    #[test]
    fn tac_must_be_four_characters() {
        let req = UpdateOrderReq {
            issue_date: NaiveDate::from_ymd_opt(2024, 1, 2),
            report_by_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            orders_type: Some(OrdersType::PermanentChangeOfStation),
            tac: Some("E19".into()),
            ..Default::default()
        };
        assert!(req.into_patch().unwrap_err().fields().unwrap().contains_key("tac"));
    }

    #[test]
    fn allowance_bounds() {
        let ok = UpdateAllowanceReq {
            pro_gear_weight: Some(2000),
            pro_gear_weight_spouse: Some(0),
            ..Default::default()
        };
        assert!(ok.into_patch().is_ok());
        let bad = UpdateAllowanceReq {
            pro_gear_weight_spouse: Some(501),
            ..Default::default()
        };
        assert!(bad.into_patch().is_err());
    }

    #[test]
    fn tio_weight_needs_remarks() {
        let req = UpdateMaxBillableWeightAsTioReq {
            authorized_weight: Some(8000),
            tio_remarks: Some(" ".into()),
        };
        assert!(req.into_parts().unwrap_err().fields().unwrap().contains_key("tioRemarks"));
    }
}
