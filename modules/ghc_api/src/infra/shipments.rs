use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::store::{check_etag, touch, InMemoryStore};
use crate::contract::model::{
    Address, AddressFields, MtoShipment, Reweigh, ReweighRequester, ShipmentPatch,
    ShipmentStatus, SitExtensionStatus, SitStatus,
};
use crate::domain::error::DomainError;
use crate::domain::ports::{
    ShipmentApprover, ShipmentCancellationRequester, ShipmentDeleter, ShipmentDiversionApprover,
    ShipmentDiversionRequester, ShipmentFetcher, ShipmentRejecter, ShipmentReweighRequester,
    ShipmentSitStatusFetcher, ShipmentUpdater, SitExtensionApprover, SitExtensionDenier,
};
use crate::domain::session::RoleType;

pub struct MemShipmentService {
    store: Arc<InMemoryStore>,
}

impl MemShipmentService {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    /// Look up, compare the version token, apply `op`, then bump `updated_at`.
    /// Runs under one write guard.
    fn transition(
        &self,
        shipment_id: Uuid,
        etag: &str,
        op: impl FnOnce(&mut MtoShipment) -> Result<(), DomainError>,
    ) -> Result<MtoShipment, DomainError> {
        let mut t = self.store.write();
        let shipment = t
            .shipments
            .get_mut(&shipment_id)
            .ok_or_else(|| DomainError::not_found("Shipment", shipment_id))?;
        check_etag(etag, shipment.updated_at, "Shipment", shipment_id)?;
        op(shipment)?;
        shipment.updated_at = touch(shipment.updated_at);
        debug!(status = ?shipment.status, "shipment updated");
        Ok(shipment.clone())
    }
}

fn conflict(from: ShipmentStatus, action: &str) -> DomainError {
    DomainError::conflict(format!("cannot {action} a shipment with status {from:?}"))
}

/// Statuses in which `role` may edit a shipment.
fn editable_by(role: RoleType, status: ShipmentStatus) -> bool {
    use ShipmentStatus::*;
    match role {
        RoleType::Too => matches!(
            status,
            Submitted
                | Approved
                | ApprovalsRequested
                | CancellationRequested
                | Canceled
                | DiversionRequested
        ),
        RoleType::ServicesCounselor => matches!(status, Submitted | Approved),
        RoleType::Tio => status == Approved,
        _ => false,
    }
}

fn apply_address(slot: &mut Option<Address>, fields: AddressFields) {
    let (id, updated_at) = match slot.as_ref() {
        Some(a) => (a.id, touch(a.updated_at)),
        None => (Uuid::new_v4(), Utc::now()),
    };
    *slot = Some(Address {
        id,
        street_address1: fields.street_address1,
        street_address2: fields.street_address2,
        street_address3: fields.street_address3,
        city: fields.city,
        state: fields.state,
        postal_code: fields.postal_code,
        country: fields.country,
        updated_at,
    });
}

fn apply_patch(s: &mut MtoShipment, patch: ShipmentPatch) {
    if let Some(d) = patch.requested_pickup_date {
        s.requested_pickup_date = Some(d);
    }
    if let Some(d) = patch.requested_delivery_date {
        s.requested_delivery_date = Some(d);
    }
    if let Some(d) = patch.scheduled_pickup_date {
        s.scheduled_pickup_date = Some(d);
    }
    if let Some(a) = patch.pickup_address {
        apply_address(&mut s.pickup_address, a);
    }
    if let Some(a) = patch.destination_address {
        apply_address(&mut s.destination_address, a);
    }
    if let Some(r) = patch.customer_remarks {
        s.customer_remarks = Some(r);
    }
    if let Some(r) = patch.counselor_remarks {
        s.counselor_remarks = Some(r);
    }
    if let Some(cap) = patch.billable_weight_cap {
        s.billable_weight_cap = Some(cap);
    }
    if let Some(j) = patch.billable_weight_justification {
        s.billable_weight_justification = Some(j);
    }
}

#[async_trait]
impl ShipmentUpdater for MemShipmentService {
    #[instrument(name = "ghc_api.service.update_shipment", skip(self, etag, patch))]
    async fn update_shipment(
        &self,
        shipment_id: Uuid,
        etag: &str,
        patch: ShipmentPatch,
        roles: &[RoleType],
    ) -> Result<MtoShipment, DomainError> {
        self.transition(shipment_id, etag, |s| {
            if !roles.iter().any(|r| editable_by(*r, s.status)) {
                return Err(DomainError::forbidden(format!(
                    "shipment with status {:?} cannot be edited with the current role",
                    s.status
                )));
            }
            apply_patch(s, patch);
            Ok(())
        })
    }
}

#[async_trait]
impl ShipmentDeleter for MemShipmentService {
    #[instrument(name = "ghc_api.service.delete_shipment", skip(self))]
    async fn delete_shipment(&self, shipment_id: Uuid) -> Result<Uuid, DomainError> {
        let mut t = self.store.write();
        let status = t
            .shipments
            .get(&shipment_id)
            .map(|s| s.status)
            .ok_or_else(|| DomainError::not_found("Shipment", shipment_id))?;
        if !matches!(
            status,
            ShipmentStatus::Draft
                | ShipmentStatus::Submitted
                | ShipmentStatus::Rejected
                | ShipmentStatus::Canceled
        ) {
            return Err(conflict(status, "delete"));
        }
        let Some(shipment) = t.shipments.remove(&shipment_id) else {
            return Err(DomainError::not_found("Shipment", shipment_id));
        };
        let move_id = shipment.move_task_order_id;
        t.deleted_shipments.insert(shipment_id, (Utc::now(), shipment));
        debug!(%move_id, "shipment soft-deleted");
        Ok(move_id)
    }
}

#[async_trait]
impl ShipmentFetcher for MemShipmentService {
    #[instrument(name = "ghc_api.service.fetch_shipment", skip(self))]
    async fn fetch_shipment(&self, shipment_id: Uuid) -> Result<MtoShipment, DomainError> {
        self.store
            .read()
            .shipments
            .get(&shipment_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Shipment", shipment_id))
    }

    #[instrument(name = "ghc_api.service.list_shipments", skip(self))]
    async fn list_shipments(&self, move_id: Uuid) -> Result<Vec<MtoShipment>, DomainError> {
        let t = self.store.read();
        if !t.moves.contains_key(&move_id) {
            return Err(DomainError::not_found("Move", move_id));
        }
        Ok(t.shipments_of(move_id))
    }
}

#[async_trait]
impl ShipmentApprover for MemShipmentService {
    #[instrument(name = "ghc_api.service.approve_shipment", skip(self, etag))]
    async fn approve_shipment(
        &self,
        shipment_id: Uuid,
        etag: &str,
    ) -> Result<MtoShipment, DomainError> {
        self.transition(shipment_id, etag, |s| match s.status {
            ShipmentStatus::Submitted | ShipmentStatus::ApprovalsRequested => {
                s.status = ShipmentStatus::Approved;
                s.approved_date = Some(Utc::now());
                Ok(())
            }
            other => Err(conflict(other, "approve")),
        })
    }
}

#[async_trait]
impl ShipmentDiversionRequester for MemShipmentService {
    #[instrument(name = "ghc_api.service.request_diversion", skip(self, etag, reason))]
    async fn request_diversion(
        &self,
        shipment_id: Uuid,
        etag: &str,
        reason: String,
    ) -> Result<MtoShipment, DomainError> {
        self.transition(shipment_id, etag, |s| match s.status {
            ShipmentStatus::Approved => {
                s.status = ShipmentStatus::DiversionRequested;
                s.diversion = true;
                s.diversion_reason = Some(reason);
                Ok(())
            }
            other => Err(conflict(other, "request a diversion for")),
        })
    }
}

#[async_trait]
impl ShipmentDiversionApprover for MemShipmentService {
    #[instrument(name = "ghc_api.service.approve_diversion", skip(self, etag))]
    async fn approve_diversion(
        &self,
        shipment_id: Uuid,
        etag: &str,
    ) -> Result<MtoShipment, DomainError> {
        self.transition(shipment_id, etag, |s| match s.status {
            ShipmentStatus::DiversionRequested => {
                s.status = ShipmentStatus::Approved;
                Ok(())
            }
            other => Err(conflict(other, "approve a diversion for")),
        })
    }
}

#[async_trait]
impl ShipmentRejecter for MemShipmentService {
    #[instrument(name = "ghc_api.service.reject_shipment", skip(self, etag, reason))]
    async fn reject_shipment(
        &self,
        shipment_id: Uuid,
        etag: &str,
        reason: String,
    ) -> Result<MtoShipment, DomainError> {
        self.transition(shipment_id, etag, |s| match s.status {
            ShipmentStatus::Submitted => {
                s.status = ShipmentStatus::Rejected;
                s.rejection_reason = Some(reason);
                Ok(())
            }
            other => Err(conflict(other, "reject")),
        })
    }
}

#[async_trait]
impl ShipmentCancellationRequester for MemShipmentService {
    #[instrument(name = "ghc_api.service.request_cancellation", skip(self, etag))]
    async fn request_cancellation(
        &self,
        shipment_id: Uuid,
        etag: &str,
    ) -> Result<MtoShipment, DomainError> {
        self.transition(shipment_id, etag, |s| match s.status {
            ShipmentStatus::Approved | ShipmentStatus::DiversionRequested => {
                s.status = ShipmentStatus::CancellationRequested;
                Ok(())
            }
            other => Err(conflict(other, "request cancellation of")),
        })
    }
}

#[async_trait]
impl ShipmentReweighRequester for MemShipmentService {
    #[instrument(name = "ghc_api.service.request_reweigh", skip(self))]
    async fn request_reweigh(
        &self,
        shipment_id: Uuid,
        requester: ReweighRequester,
    ) -> Result<Reweigh, DomainError> {
        let mut t = self.store.write();
        let shipment = t
            .shipments
            .get_mut(&shipment_id)
            .ok_or_else(|| DomainError::not_found("Shipment", shipment_id))?;
        if shipment.reweigh.is_some() {
            return Err(DomainError::conflict(format!(
                "a reweigh was already requested for shipment {shipment_id}"
            )));
        }
        if !matches!(
            shipment.status,
            ShipmentStatus::Approved | ShipmentStatus::DiversionRequested
        ) {
            return Err(conflict(shipment.status, "request a reweigh for"));
        }
        let reweigh = Reweigh {
            id: Uuid::new_v4(),
            shipment_id,
            requested_at: Utc::now(),
            requested_by: requester,
            verification_reason: None,
            weight: None,
            verification_provided_at: None,
        };
        shipment.reweigh = Some(reweigh.clone());
        Ok(reweigh)
    }
}

#[async_trait]
impl ShipmentSitStatusFetcher for MemShipmentService {
    async fn sit_status(&self, shipment: &MtoShipment) -> Result<Option<SitStatus>, DomainError> {
        let stored = self.store.read().sit_statuses.get(&shipment.id).cloned();
        Ok(match (stored, shipment.sit_days_allowance) {
            (Some(st), Some(allowance)) => Some(st.against_allowance(allowance)),
            (stored, _) => stored,
        })
    }
}

#[async_trait]
impl SitExtensionApprover for MemShipmentService {
    #[instrument(
        name = "ghc_api.service.approve_sit_extension",
        skip(self, request_reason, office_remarks, etag)
    )]
    async fn approve_sit_extension(
        &self,
        shipment_id: Uuid,
        sit_extension_id: Uuid,
        approved_days: i64,
        request_reason: Option<String>,
        office_remarks: Option<String>,
        etag: &str,
    ) -> Result<MtoShipment, DomainError> {
        self.transition(shipment_id, etag, |s| {
            let now = Utc::now();
            let allowance = s
                .sit_days_allowance
                .unwrap_or(0)
                .checked_add(approved_days)
                .ok_or_else(|| {
                    DomainError::invalid_field("approvedDays", "exceeds the SIT allowance limit")
                })?;
            let ext = s
                .sit_extensions
                .iter_mut()
                .find(|e| e.id == sit_extension_id)
                .ok_or_else(|| DomainError::not_found("SIT extension", sit_extension_id))?;
            if ext.status != SitExtensionStatus::Pending {
                return Err(DomainError::conflict(format!(
                    "SIT extension {sit_extension_id} is not pending"
                )));
            }
            ext.status = SitExtensionStatus::Approved;
            ext.approved_days = Some(approved_days);
            if let Some(reason) = request_reason {
                ext.request_reason = reason;
            }
            ext.office_remarks = office_remarks;
            ext.decision_date = Some(now);
            ext.updated_at = touch(ext.updated_at);
            s.sit_days_allowance = Some(allowance);
            Ok(())
        })
    }
}

#[async_trait]
impl SitExtensionDenier for MemShipmentService {
    #[instrument(name = "ghc_api.service.deny_sit_extension", skip(self, office_remarks, etag))]
    async fn deny_sit_extension(
        &self,
        shipment_id: Uuid,
        sit_extension_id: Uuid,
        office_remarks: Option<String>,
        convert_to_customer_expense: bool,
        etag: &str,
    ) -> Result<MtoShipment, DomainError> {
        self.transition(shipment_id, etag, |s| {
            let ext = s
                .sit_extensions
                .iter_mut()
                .find(|e| e.id == sit_extension_id)
                .ok_or_else(|| DomainError::not_found("SIT extension", sit_extension_id))?;
            if ext.status != SitExtensionStatus::Pending {
                return Err(DomainError::conflict(format!(
                    "SIT extension {sit_extension_id} is not pending"
                )));
            }
            ext.status = SitExtensionStatus::Denied;
            ext.office_remarks = office_remarks;
            ext.customer_expense = convert_to_customer_expense;
            ext.decision_date = Some(Utc::now());
            ext.updated_at = touch(ext.updated_at);
            Ok(())
        })
    }
}
