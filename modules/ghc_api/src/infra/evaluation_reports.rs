use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use super::store::{check_etag, sort_by_created, touch, InMemoryStore, Tables};
use crate::contract::model::{
    EvaluationReport, EvaluationReportDraft, EvaluationReportLocation, EvaluationReportType,
    NewEvaluationReport, OfficeUserRef,
};
use crate::domain::error::{DomainError, FieldErrors};
use crate::domain::ports::{
    EvaluationReportCreator, EvaluationReportDeleter, EvaluationReportFetcher,
    EvaluationReportUpdater,
};

pub struct MemEvaluationReportService {
    store: Arc<InMemoryStore>,
}

impl MemEvaluationReportService {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    fn list(
        &self,
        move_id: Uuid,
        office_user_id: Uuid,
        report_type: EvaluationReportType,
    ) -> Result<Vec<EvaluationReport>, DomainError> {
        let t = self.store.read();
        if !t.moves.contains_key(&move_id) {
            return Err(DomainError::not_found("Move", move_id));
        }
        let mut out: Vec<EvaluationReport> = t
            .reports
            .values()
            .filter(|r| r.move_id == move_id && r.report_type == report_type)
            .filter(|r| r.submitted_at.is_some() || r.office_user.id == office_user_id)
            .cloned()
            .collect();
        sort_by_created(&mut out, |r| (r.created_at, r.id));
        Ok(out)
    }
}

/// Drafts belong to their author; submitted reports are readable by anyone.
fn visible(report: &EvaluationReport, office_user_id: Uuid) -> Result<(), DomainError> {
    if report.submitted_at.is_none() && report.office_user.id != office_user_id {
        return Err(DomainError::forbidden(
            "draft evaluation reports are only visible to their author",
        ));
    }
    Ok(())
}

/// Author-owned draft, ready for mutation.
fn own_draft<'a>(
    t: &'a mut Tables,
    report_id: Uuid,
    office_user_id: Uuid,
) -> Result<&'a mut EvaluationReport, DomainError> {
    let report = t
        .reports
        .get_mut(&report_id)
        .ok_or_else(|| DomainError::not_found("Evaluation report", report_id))?;
    visible(report, office_user_id)?;
    if report.submitted_at.is_some() {
        return Err(DomainError::conflict(format!(
            "evaluation report {report_id} has already been submitted"
        )));
    }
    Ok(report)
}

fn check_submittable(report: &EvaluationReport) -> Result<(), DomainError> {
    let mut errs = FieldErrors::new();
    errs.check(report.inspection_date.is_some(), "inspectionDate", "is required");
    errs.check(report.inspection_type.is_some(), "inspectionType", "is required");
    errs.check(report.location.is_some(), "location", "is required");
    errs.check(
        report.violations_observed.is_some(),
        "violationsObserved",
        "is required",
    );
    if report.location == Some(EvaluationReportLocation::Other) {
        errs.check(
            report
                .location_description
                .as_deref()
                .is_some_and(|d| !d.trim().is_empty()),
            "locationDescription",
            "is required when location is OTHER",
        );
    }
    errs.into_result()
}

#[async_trait]
impl EvaluationReportFetcher for MemEvaluationReportService {
    #[instrument(name = "ghc_api.service.fetch_report", skip(self))]
    async fn fetch_report(
        &self,
        report_id: Uuid,
        office_user_id: Uuid,
    ) -> Result<EvaluationReport, DomainError> {
        let t = self.store.read();
        let report = t
            .reports
            .get(&report_id)
            .ok_or_else(|| DomainError::not_found("Evaluation report", report_id))?;
        visible(report, office_user_id)?;
        Ok(report.clone())
    }

    #[instrument(name = "ghc_api.service.list_shipment_reports", skip(self))]
    async fn list_shipment_reports(
        &self,
        move_id: Uuid,
        office_user_id: Uuid,
    ) -> Result<Vec<EvaluationReport>, DomainError> {
        self.list(move_id, office_user_id, EvaluationReportType::Shipment)
    }

    #[instrument(name = "ghc_api.service.list_counseling_reports", skip(self))]
    async fn list_counseling_reports(
        &self,
        move_id: Uuid,
        office_user_id: Uuid,
    ) -> Result<Vec<EvaluationReport>, DomainError> {
        self.list(move_id, office_user_id, EvaluationReportType::Counseling)
    }
}

#[async_trait]
impl EvaluationReportCreator for MemEvaluationReportService {
    #[instrument(name = "ghc_api.service.create_report", skip(self))]
    async fn create_report(
        &self,
        move_locator: &str,
        new: NewEvaluationReport,
    ) -> Result<EvaluationReport, DomainError> {
        let mut t = self.store.write();
        let mv = t.move_by_locator(move_locator)?;
        let (move_id, move_reference_id) = (mv.id, mv.reference_id.clone());

        let report_type = match new.shipment_id {
            Some(shipment_id) => {
                let belongs = t
                    .shipments
                    .get(&shipment_id)
                    .is_some_and(|s| s.move_task_order_id == move_id);
                if !belongs {
                    return Err(DomainError::not_found("Shipment", shipment_id));
                }
                EvaluationReportType::Shipment
            }
            None => EvaluationReportType::Counseling,
        };

        let office_user = t
            .office_users
            .get(&new.office_user_id)
            .cloned()
            .unwrap_or_else(|| OfficeUserRef {
                id: new.office_user_id,
                first_name: String::new(),
                last_name: String::new(),
                email: String::new(),
            });

        let now = Utc::now();
        let report = EvaluationReport {
            id: Uuid::new_v4(),
            move_id,
            move_reference_id,
            shipment_id: new.shipment_id,
            report_type,
            office_user,
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
        t.reports.insert(report.id, report.clone());
        Ok(report)
    }
}

#[async_trait]
impl EvaluationReportUpdater for MemEvaluationReportService {
    #[instrument(name = "ghc_api.service.update_report", skip(self, draft, etag))]
    async fn update_report(
        &self,
        report_id: Uuid,
        office_user_id: Uuid,
        draft: EvaluationReportDraft,
        etag: &str,
    ) -> Result<EvaluationReport, DomainError> {
        let mut t = self.store.write();
        let report = own_draft(&mut t, report_id, office_user_id)?;
        check_etag(etag, report.updated_at, "Evaluation report", report_id)?;

        report.inspection_date = draft.inspection_date;
        report.inspection_type = draft.inspection_type;
        report.location = draft.location;
        report.location_description = draft.location_description;
        report.observed_shipment_delivery_date = draft.observed_shipment_delivery_date;
        report.observed_shipment_physical_pickup_date =
            draft.observed_shipment_physical_pickup_date;
        report.time_depart = draft.time_depart;
        report.eval_start = draft.eval_start;
        report.eval_end = draft.eval_end;
        report.violations_observed = draft.violations_observed;
        report.remarks = draft.remarks;
        report.serious_incident = draft.serious_incident;
        report.serious_incident_desc = draft.serious_incident_desc;
        report.updated_at = touch(report.updated_at);
        Ok(report.clone())
    }

    #[instrument(name = "ghc_api.service.submit_report", skip(self, etag))]
    async fn submit_report(
        &self,
        report_id: Uuid,
        office_user_id: Uuid,
        etag: &str,
    ) -> Result<EvaluationReport, DomainError> {
        let mut t = self.store.write();
        let report = own_draft(&mut t, report_id, office_user_id)?;
        check_etag(etag, report.updated_at, "Evaluation report", report_id)?;
        check_submittable(report)?;
        let now = Utc::now();
        report.submitted_at = Some(now);
        report.updated_at = touch(report.updated_at);
        Ok(report.clone())
    }
}

#[async_trait]
impl EvaluationReportDeleter for MemEvaluationReportService {
    #[instrument(name = "ghc_api.service.delete_report", skip(self))]
    async fn delete_report(
        &self,
        report_id: Uuid,
        office_user_id: Uuid,
    ) -> Result<(), DomainError> {
        let mut t = self.store.write();
        own_draft(&mut t, report_id, office_user_id)?;
        t.reports.remove(&report_id);
        Ok(())
    }
}
