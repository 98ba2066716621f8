use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use super::store::{check_etag, touch, InMemoryStore};
use crate::contract::model::{PaymentServiceItem, PaymentServiceItemStatus};
use crate::domain::error::DomainError;
use crate::domain::ports::PaymentServiceItemStatusUpdater;

pub struct MemPaymentServiceItemService {
    store: Arc<InMemoryStore>,
}

impl MemPaymentServiceItemService {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PaymentServiceItemStatusUpdater for MemPaymentServiceItemService {
    #[instrument(
        name = "ghc_api.service.update_payment_service_item_status",
        skip(self, rejection_reason, etag)
    )]
    async fn update_status(
        &self,
        move_task_order_id: Uuid,
        payment_service_item_id: Uuid,
        status: PaymentServiceItemStatus,
        rejection_reason: Option<String>,
        etag: &str,
    ) -> Result<PaymentServiceItem, DomainError> {
        let mut t = self.store.write();
        let item = t
            .payment_service_items
            .get_mut(&payment_service_item_id)
            .filter(|i| i.move_task_order_id == move_task_order_id)
            .ok_or_else(|| {
                DomainError::not_found("Payment service item", payment_service_item_id)
            })?;
        check_etag(
            etag,
            item.updated_at,
            "Payment service item",
            payment_service_item_id,
        )?;
        if matches!(
            item.status,
            PaymentServiceItemStatus::SentToGex
                | PaymentServiceItemStatus::ReceivedByGex
                | PaymentServiceItemStatus::Paid
        ) {
            return Err(DomainError::conflict(format!(
                "payment service item is already {}",
                item.status.as_str()
            )));
        }
        item.status = status;
        item.rejection_reason = match status {
            PaymentServiceItemStatus::Denied => rejection_reason,
            _ => None,
        };
        item.updated_at = touch(item.updated_at);
        Ok(item.clone())
    }
}
