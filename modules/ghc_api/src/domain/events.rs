use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Endpoint that triggered an event, rendered as `Ghc.<Operation>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKey {
    UpdateShipment,
    DeleteShipment,
    ApproveShipment,
    RequestShipmentDiversion,
    ApproveShipmentDiversion,
    RejectShipment,
    RequestShipmentCancellation,
    RequestShipmentReweigh,
    ApproveSitExtension,
    DenySitExtension,
    UpdateOrder,
    CounselingUpdateOrder,
    UpdateAllowance,
    CounselingUpdateAllowance,
    UpdateBillableWeight,
    UpdateMaxBillableWeightAsTio,
    AcknowledgeExcessWeightRisk,
    UpdatePaymentServiceItemStatus,
}

impl EndpointKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpdateShipment => "Ghc.UpdateMTOShipment",
            Self::DeleteShipment => "Ghc.DeleteShipment",
            Self::ApproveShipment => "Ghc.ApproveShipment",
            Self::RequestShipmentDiversion => "Ghc.RequestShipmentDiversion",
            Self::ApproveShipmentDiversion => "Ghc.ApproveShipmentDiversion",
            Self::RejectShipment => "Ghc.RejectShipment",
            Self::RequestShipmentCancellation => "Ghc.RequestShipmentCancellation",
            Self::RequestShipmentReweigh => "Ghc.RequestShipmentReweigh",
            Self::ApproveSitExtension => "Ghc.ApproveSITExtension",
            Self::DenySitExtension => "Ghc.DenySITExtension",
            Self::UpdateOrder => "Ghc.UpdateOrder",
            Self::CounselingUpdateOrder => "Ghc.CounselingUpdateOrder",
            Self::UpdateAllowance => "Ghc.UpdateAllowance",
            Self::CounselingUpdateAllowance => "Ghc.CounselingUpdateAllowance",
            Self::UpdateBillableWeight => "Ghc.UpdateBillableWeight",
            Self::UpdateMaxBillableWeightAsTio => "Ghc.UpdateMaxBillableWeightAsTIO",
            Self::AcknowledgeExcessWeightRisk => "Ghc.AcknowledgeExcessWeightRisk",
            Self::UpdatePaymentServiceItemStatus => "Ghc.UpdatePaymentServiceItemStatus",
        }
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of change, rendered as `<Object>.<Action>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKey {
    ShipmentUpdate,
    ShipmentDelete,
    ShipmentApprove,
    ShipmentRequestDiversion,
    ShipmentApproveDiversion,
    ShipmentReject,
    ShipmentRequestCancellation,
    ShipmentRequestReweigh,
    ShipmentApproveSitExtension,
    ShipmentDenySitExtension,
    OrderUpdate,
    MoveTaskOrderUpdate,
    PaymentRequestUpdate,
}

impl EventKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ShipmentUpdate => "MTOShipment.Update",
            Self::ShipmentDelete => "Shipment.Delete",
            Self::ShipmentApprove => "MTOShipment.Approve",
            Self::ShipmentRequestDiversion => "MTOShipment.RequestDiversion",
            Self::ShipmentApproveDiversion => "MTOShipment.ApproveDiversion",
            Self::ShipmentReject => "MTOShipment.Reject",
            Self::ShipmentRequestCancellation => "MTOShipment.RequestCancellation",
            Self::ShipmentRequestReweigh => "MTOShipment.RequestReweigh",
            Self::ShipmentApproveSitExtension => "MTOShipment.ApproveSITExtension",
            Self::ShipmentDenySitExtension => "MTOShipment.DenySITExtension",
            Self::OrderUpdate => "Order.Update",
            Self::MoveTaskOrderUpdate => "MoveTaskOrder.Update",
            Self::PaymentRequestUpdate => "PaymentRequest.Update",
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state-change notification handed to the event trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_key: EventKey,
    pub endpoint_key: EndpointKey,
    pub object_id: Uuid,
    pub move_id: Uuid,
    pub trace_id: Option<String>,
}

/// One audit-trail entry for a successful mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub operation: &'static str,
    pub object_type: &'static str,
    pub object_id: Uuid,
    pub actor_user_id: Uuid,
    pub office_user_id: Option<Uuid>,
    pub method: String,
    pub path: String,
    pub trace_id: Option<String>,
    pub at: DateTime<Utc>,
}
