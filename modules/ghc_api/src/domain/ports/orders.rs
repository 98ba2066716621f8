use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{AllowancePatch, CounselingOrderPatch, Move, Order, OrderPatch};
use crate::domain::error::DomainError;

#[async_trait]
pub trait OrderFetcher: Send + Sync {
    async fn fetch_order(&self, order_id: Uuid) -> Result<Order, DomainError>;
}

/// Order and allowance updates. Each returns the updated order and the id of
/// the move it belongs to.
#[async_trait]
pub trait OrderUpdater: Send + Sync {
    async fn update_order_as_too(
        &self,
        order_id: Uuid,
        etag: &str,
        patch: OrderPatch,
    ) -> Result<(Order, Uuid), DomainError>;

    async fn update_order_as_counselor(
        &self,
        order_id: Uuid,
        etag: &str,
        patch: CounselingOrderPatch,
    ) -> Result<(Order, Uuid), DomainError>;

    async fn update_allowance_as_too(
        &self,
        order_id: Uuid,
        etag: &str,
        patch: AllowancePatch,
    ) -> Result<(Order, Uuid), DomainError>;

    async fn update_allowance_as_counselor(
        &self,
        order_id: Uuid,
        etag: &str,
        patch: AllowancePatch,
    ) -> Result<(Order, Uuid), DomainError>;
}

#[async_trait]
pub trait ExcessWeightRiskManager: Send + Sync {
    /// `etag` is the move's token.
    async fn acknowledge_excess_weight_risk(
        &self,
        order_id: Uuid,
        etag: &str,
    ) -> Result<Move, DomainError>;

    async fn update_billable_weight(
        &self,
        order_id: Uuid,
        weight: i64,
        etag: &str,
    ) -> Result<(Order, Uuid), DomainError>;

    async fn update_max_billable_weight_as_tio(
        &self,
        order_id: Uuid,
        weight: i64,
        remarks: String,
        etag: &str,
    ) -> Result<(Order, Uuid), DomainError>;
}
