//! Narrow service-layer interfaces consumed by the REST handlers.
//!
//! Each trait covers one capability so handlers depend only on what they call
//! and tests can substitute a single collaborator.

mod customers;
mod evaluation_reports;
mod moves;
mod orders;
mod payments;
mod platform;
mod shipments;
mod uploads;

pub use customers::{CustomerFetcher, CustomerSearcher, CustomerUpdater};
pub use evaluation_reports::{
    EvaluationReportCreator, EvaluationReportDeleter, EvaluationReportFetcher,
    EvaluationReportUpdater,
};
pub use moves::{
    MoveCanceler, MoveCloseoutOfficeUpdater, MoveFetcher, MoveFinancialReviewFlagSetter,
    MoveLocker, MoveSearcher,
};
pub use orders::{ExcessWeightRiskManager, OrderFetcher, OrderUpdater};
pub use payments::PaymentServiceItemStatusUpdater;
pub use platform::{AuditCapture, EventTrigger, FileStorer, SessionResolver};
pub use shipments::{
    ShipmentApprover, ShipmentCancellationRequester, ShipmentDeleter, ShipmentDiversionApprover,
    ShipmentDiversionRequester, ShipmentFetcher, ShipmentRejecter, ShipmentReweighRequester,
    ShipmentSitStatusFetcher, ShipmentUpdater, SitExtensionApprover, SitExtensionDenier,
};
pub use uploads::{DocumentFetcher, UploadDeleter, UploadUpdater};
