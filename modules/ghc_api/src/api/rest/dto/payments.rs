use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::tag;
use crate::contract::model::{PaymentServiceItem, PaymentServiceItemStatus};
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentServiceItemDto {
    pub id: Uuid,
    pub move_task_order_id: Uuid,
    pub mto_service_item_id: Uuid,
    pub mto_service_item_code: String,
    pub mto_service_item_name: String,
    pub mto_shipment_id: Option<Uuid>,
    pub price_cents: Option<i64>,
    pub rejection_reason: Option<String>,
    pub status: PaymentServiceItemStatus,
    pub reference_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub e_tag: String,
}

impl From<&PaymentServiceItem> for PaymentServiceItemDto {
    fn from(p: &PaymentServiceItem) -> Self {
        Self {
            id: p.id,
            move_task_order_id: p.move_task_order_id,
            mto_service_item_id: p.mto_service_item_id,
            mto_service_item_code: p.mto_service_item_code.clone(),
            mto_service_item_name: p.mto_service_item_name.clone(),
            mto_shipment_id: p.mto_shipment_id,
            price_cents: p.price_cents,
            rejection_reason: p.rejection_reason.clone(),
            status: p.status,
            reference_id: p.reference_id.clone(),
            created_at: p.created_at,
            e_tag: tag(p.updated_at),
        }
    }
}

/// `status` is kept as a raw string so an empty or unknown value is reported
/// as a field error rather than a malformed body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentServiceItemStatusReq {
    pub status: Option<String>,
    pub rejection_reason: Option<String>,
}

impl UpdatePaymentServiceItemStatusReq {
    pub fn into_parts(self) -> Result<(PaymentServiceItemStatus, Option<String>), DomainError> {
        let raw = self.status.unwrap_or_default();
        if raw.trim().is_empty() {
            return Err(DomainError::invalid_field("status", "must not be empty"));
        }
        let status = PaymentServiceItemStatus::parse_reviewable(raw.trim()).ok_or_else(|| {
            DomainError::invalid_field("status", "must be one of REQUESTED, APPROVED, DENIED")
        })?;
        let reason = self.rejection_reason.filter(|r| !r.trim().is_empty());
        if status == PaymentServiceItemStatus::Denied && reason.is_none() {
            return Err(DomainError::invalid_field(
                "rejectionReason",
                "is required when denying a service item",
            ));
        }
        Ok((status, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(status: &str, reason: Option<&str>) -> UpdatePaymentServiceItemStatusReq {
        UpdatePaymentServiceItemStatusReq {
            status: Some(status.to_string()),
            rejection_reason: reason.map(str::to_string),
        }
    }

    #[test]
    fn status_validation() {
        assert!(req("", None).into_parts().unwrap_err().fields().unwrap().contains_key("status"));
        assert!(req("PAID", None).into_parts().is_err());
        assert!(req("DENIED", None).into_parts().is_err());
        let (s, r) = req("DENIED", Some("duplicate")).into_parts().unwrap();
        assert_eq!(s, PaymentServiceItemStatus::Denied);
        assert_eq!(r.as_deref(), Some("duplicate"));
        assert_eq!(req("APPROVED", None).into_parts().unwrap().0, PaymentServiceItemStatus::Approved);
    }
}
