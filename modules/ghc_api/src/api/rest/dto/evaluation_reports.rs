use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::tag;
use crate::contract::model::{
    EvaluationReport, EvaluationReportDraft, EvaluationReportLocation, EvaluationReportType,
    InspectionType, OfficeUserRef,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReportOfficeUserDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&OfficeUserRef> for EvaluationReportOfficeUserDto {
    fn from(u: &OfficeUserRef) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            email: u.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReportDto {
    pub id: Uuid,
    pub move_id: Uuid,
    pub move_reference_id: Option<String>,
    pub shipment_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub report_type: EvaluationReportType,
    pub office_user: EvaluationReportOfficeUserDto,
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
    pub e_tag: String,
}

impl From<&EvaluationReport> for EvaluationReportDto {
    fn from(r: &EvaluationReport) -> Self {
        Self {
            id: r.id,
            move_id: r.move_id,
            move_reference_id: r.move_reference_id.clone(),
            shipment_id: r.shipment_id,
            report_type: r.report_type,
            office_user: EvaluationReportOfficeUserDto::from(&r.office_user),
            inspection_date: r.inspection_date,
            inspection_type: r.inspection_type,
            location: r.location,
            location_description: r.location_description.clone(),
            observed_shipment_delivery_date: r.observed_shipment_delivery_date,
            observed_shipment_physical_pickup_date: r.observed_shipment_physical_pickup_date,
            time_depart: r.time_depart,
            eval_start: r.eval_start,
            eval_end: r.eval_end,
            violations_observed: r.violations_observed,
            remarks: r.remarks.clone(),
            serious_incident: r.serious_incident,
            serious_incident_desc: r.serious_incident_desc.clone(),
            submitted_at: r.submitted_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
            e_tag: tag(r.updated_at),
        }
    }
}

pub fn report_list(reports: &[EvaluationReport]) -> Vec<EvaluationReportDto> {
    reports.iter().map(EvaluationReportDto::from).collect()
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvaluationReportReq {
    pub shipment_id: Option<Uuid>,
}

/// Full replacement of a draft report's editable fields.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveEvaluationReportReq {
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

impl From<SaveEvaluationReportReq> for EvaluationReportDraft {
    fn from(r: SaveEvaluationReportReq) -> Self {
        Self {
            inspection_date: r.inspection_date,
            inspection_type: r.inspection_type,
            location: r.location,
            location_description: r.location_description,
            observed_shipment_delivery_date: r.observed_shipment_delivery_date,
            observed_shipment_physical_pickup_date: r.observed_shipment_physical_pickup_date,
            time_depart: r.time_depart,
            eval_start: r.eval_start,
            eval_end: r.eval_end,
            violations_observed: r.violations_observed,
            remarks: r.remarks,
            serious_incident: r.serious_incident,
            serious_incident_desc: r.serious_incident_desc,
        }
    }
}
