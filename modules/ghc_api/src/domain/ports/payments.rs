use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{PaymentServiceItem, PaymentServiceItemStatus};
use crate::domain::error::DomainError;

#[async_trait]
pub trait PaymentServiceItemStatusUpdater: Send + Sync {
    async fn update_status(
        &self,
        move_task_order_id: Uuid,
        payment_service_item_id: Uuid,
        status: PaymentServiceItemStatus,
        rejection_reason: Option<String>,
        etag: &str,
    ) -> Result<PaymentServiceItem, DomainError>;
}
