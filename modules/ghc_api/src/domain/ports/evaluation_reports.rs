use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{EvaluationReport, EvaluationReportDraft, NewEvaluationReport};
use crate::domain::error::DomainError;

/// Reads are scoped to the requesting office user; reports written by
/// someone else are `Forbidden`.
#[async_trait]
pub trait EvaluationReportFetcher: Send + Sync {
    async fn fetch_report(
        &self,
        report_id: Uuid,
        office_user_id: Uuid,
    ) -> Result<EvaluationReport, DomainError>;

    async fn list_shipment_reports(
        &self,
        move_id: Uuid,
        office_user_id: Uuid,
    ) -> Result<Vec<EvaluationReport>, DomainError>;

    async fn list_counseling_reports(
        &self,
        move_id: Uuid,
        office_user_id: Uuid,
    ) -> Result<Vec<EvaluationReport>, DomainError>;
}

#[async_trait]
pub trait EvaluationReportCreator: Send + Sync {
    async fn create_report(
        &self,
        move_locator: &str,
        report: NewEvaluationReport,
    ) -> Result<EvaluationReport, DomainError>;
}

#[async_trait]
pub trait EvaluationReportUpdater: Send + Sync {
    async fn update_report(
        &self,
        report_id: Uuid,
        office_user_id: Uuid,
        draft: EvaluationReportDraft,
        etag: &str,
    ) -> Result<EvaluationReport, DomainError>;

    async fn submit_report(
        &self,
        report_id: Uuid,
        office_user_id: Uuid,
        etag: &str,
    ) -> Result<EvaluationReport, DomainError>;
}

#[async_trait]
pub trait EvaluationReportDeleter: Send + Sync {
    async fn delete_report(&self, report_id: Uuid, office_user_id: Uuid)
        -> Result<(), DomainError>;
}
