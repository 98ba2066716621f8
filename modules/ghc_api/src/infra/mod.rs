//! In-memory collaborators: a locked table store, service implementations of
//! every port, local presigned storage, audit logging and a notification
//! queue.

pub mod audit;
pub mod customers;
pub mod evaluation_reports;
pub mod moves;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod seed;
pub mod sessions;
pub mod shipments;
pub mod storage;
pub mod store;
pub mod uploads;

use std::sync::Arc;

use crate::api::rest::state::Services;

pub use audit::TracingAuditCapture;
pub use customers::MemCustomerService;
pub use evaluation_reports::MemEvaluationReportService;
pub use moves::MemMoveService;
pub use notifications::{InMemoryNotificationQueue, Notification, NotificationStatus};
pub use orders::MemOrderService;
pub use payments::MemPaymentServiceItemService;
pub use sessions::StaticSessionResolver;
pub use shipments::MemShipmentService;
pub use storage::LocalFileStorer;
pub use store::{InMemoryStore, Tables};
pub use uploads::MemUploadService;

/// Every port backed by `store`. Callers may swap individual fields.
pub fn in_memory_services(store: Arc<InMemoryStore>) -> Services {
    let moves = Arc::new(MemMoveService::new(store.clone()));
    let shipments = Arc::new(MemShipmentService::new(store.clone()));
    let orders = Arc::new(MemOrderService::new(store.clone()));
    let reports = Arc::new(MemEvaluationReportService::new(store.clone()));
    let payments = Arc::new(MemPaymentServiceItemService::new(store.clone()));
    let customers = Arc::new(MemCustomerService::new(store.clone()));
    let uploads = Arc::new(MemUploadService::new(store));

    Services {
        move_fetcher: moves.clone(),
        move_searcher: moves.clone(),
        move_locker: moves.clone(),
        financial_review_flag_setter: moves.clone(),
        closeout_office_updater: moves.clone(),
        move_canceler: moves,

        shipment_fetcher: shipments.clone(),
        shipment_updater: shipments.clone(),
        shipment_deleter: shipments.clone(),
        shipment_approver: shipments.clone(),
        diversion_requester: shipments.clone(),
        diversion_approver: shipments.clone(),
        shipment_rejecter: shipments.clone(),
        cancellation_requester: shipments.clone(),
        reweigh_requester: shipments.clone(),
        sit_status_fetcher: shipments.clone(),
        sit_extension_approver: shipments.clone(),
        sit_extension_denier: shipments,

        order_fetcher: orders.clone(),
        order_updater: orders.clone(),
        excess_weight_risk_manager: orders,

        report_fetcher: reports.clone(),
        report_creator: reports.clone(),
        report_updater: reports.clone(),
        report_deleter: reports,

        payment_service_item_status_updater: payments,

        customer_fetcher: customers.clone(),
        customer_updater: customers.clone(),
        customer_searcher: customers,

        document_fetcher: uploads.clone(),
        upload_updater: uploads.clone(),
        upload_deleter: uploads,
    }
}
