use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{MtoShipment, Reweigh, ReweighRequester, ShipmentPatch, SitStatus};
use crate::domain::error::DomainError;
use crate::domain::session::RoleType;

#[async_trait]
pub trait ShipmentFetcher: Send + Sync {
    async fn fetch_shipment(&self, shipment_id: Uuid) -> Result<MtoShipment, DomainError>;

    /// Shipments of a move in creation order.
    async fn list_shipments(&self, move_id: Uuid) -> Result<Vec<MtoShipment>, DomainError>;
}

#[async_trait]
pub trait ShipmentUpdater: Send + Sync {
    /// Apply `patch` for an office user holding `roles`. Which shipment
    /// statuses each role may edit is enforced here.
    async fn update_shipment(
        &self,
        shipment_id: Uuid,
        etag: &str,
        patch: ShipmentPatch,
        roles: &[RoleType],
    ) -> Result<MtoShipment, DomainError>;
}

#[async_trait]
pub trait ShipmentDeleter: Send + Sync {
    /// Soft-delete a shipment that has not been approved yet. Returns the id
    /// of the move it belonged to.
    async fn delete_shipment(&self, shipment_id: Uuid) -> Result<Uuid, DomainError>;
}

#[async_trait]
pub trait ShipmentApprover: Send + Sync {
    async fn approve_shipment(
        &self,
        shipment_id: Uuid,
        etag: &str,
    ) -> Result<MtoShipment, DomainError>;
}

#[async_trait]
pub trait ShipmentDiversionRequester: Send + Sync {
    async fn request_diversion(
        &self,
        shipment_id: Uuid,
        etag: &str,
        reason: String,
    ) -> Result<MtoShipment, DomainError>;
}

#[async_trait]
pub trait ShipmentDiversionApprover: Send + Sync {
    async fn approve_diversion(
        &self,
        shipment_id: Uuid,
        etag: &str,
    ) -> Result<MtoShipment, DomainError>;
}

#[async_trait]
pub trait ShipmentRejecter: Send + Sync {
    async fn reject_shipment(
        &self,
        shipment_id: Uuid,
        etag: &str,
        reason: String,
    ) -> Result<MtoShipment, DomainError>;
}

#[async_trait]
pub trait ShipmentCancellationRequester: Send + Sync {
    async fn request_cancellation(
        &self,
        shipment_id: Uuid,
        etag: &str,
    ) -> Result<MtoShipment, DomainError>;
}

#[async_trait]
pub trait ShipmentReweighRequester: Send + Sync {
    async fn request_reweigh(
        &self,
        shipment_id: Uuid,
        requester: ReweighRequester,
    ) -> Result<Reweigh, DomainError>;
}

#[async_trait]
pub trait ShipmentSitStatusFetcher: Send + Sync {
    /// `None` when the shipment has no storage-in-transit history.
    async fn sit_status(&self, shipment: &MtoShipment) -> Result<Option<SitStatus>, DomainError>;
}

#[async_trait]
pub trait SitExtensionApprover: Send + Sync {
    async fn approve_sit_extension(
        &self,
        shipment_id: Uuid,
        sit_extension_id: Uuid,
        approved_days: i64,
        request_reason: Option<String>,
        office_remarks: Option<String>,
        etag: &str,
    ) -> Result<MtoShipment, DomainError>;
}

#[async_trait]
pub trait SitExtensionDenier: Send + Sync {
    async fn deny_sit_extension(
        &self,
        shipment_id: Uuid,
        sit_extension_id: Uuid,
        office_remarks: Option<String>,
        convert_to_customer_expense: bool,
        etag: &str,
    ) -> Result<MtoShipment, DomainError>;
}
