use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{tag, PageQuery};
use super::documents::DocumentDto;
use super::orders::OrderDto;
use crate::contract::model::{
    Move, MoveStatus, OrdersType, Paged, SearchMovesParams, ShipmentStatus, SortOrder,
};
use crate::domain::error::DomainError;
use crate::domain::ports::FileStorer;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveDto {
    pub id: Uuid,
    pub locator: String,
    pub status: MoveStatus,
    pub orders_id: Uuid,
    pub orders: Option<OrderDto>,
    pub reference_id: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub available_to_prime_at: Option<DateTime<Utc>>,
    pub excess_weight_qualified_at: Option<DateTime<Utc>>,
    pub excess_weight_acknowledged_at: Option<DateTime<Utc>>,
    pub billable_weights_reviewed_at: Option<DateTime<Utc>>,
    pub tio_remarks: Option<String>,
    pub financial_review_flag: bool,
    pub financial_review_remarks: Option<String>,
    pub closeout_office_id: Option<Uuid>,
    pub locked_by_office_user_id: Option<Uuid>,
    pub lock_expires_at: Option<DateTime<Utc>>,
    pub additional_documents: Option<DocumentDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub e_tag: String,
}

impl MoveDto {
    /// Additional documents need presigned URLs, hence async.
    pub async fn build(m: &Move, storer: &dyn FileStorer) -> Result<Self, DomainError> {
        let additional_documents = match &m.additional_documents {
            Some(d) => Some(DocumentDto::build(d, storer).await?),
            None => None,
        };
        Ok(Self {
            id: m.id,
            locator: m.locator.clone(),
            status: m.status,
            orders_id: m.orders_id,
            orders: m.orders.as_ref().map(OrderDto::from),
            reference_id: m.reference_id.clone(),
            submitted_at: m.submitted_at,
            approved_at: m.approved_at,
            available_to_prime_at: m.available_to_prime_at,
            excess_weight_qualified_at: m.excess_weight_qualified_at,
            excess_weight_acknowledged_at: m.excess_weight_acknowledged_at,
            billable_weights_reviewed_at: m.billable_weights_reviewed_at,
            tio_remarks: m.tio_remarks.clone(),
            financial_review_flag: m.financial_review_flag,
            financial_review_remarks: m.financial_review_remarks.clone(),
            closeout_office_id: m.closeout_office_id,
            locked_by_office_user_id: m.locked_by_office_user_id,
            lock_expires_at: m.lock_expires_at,
            additional_documents,
            created_at: m.created_at,
            updated_at: m.updated_at,
            e_tag: tag(m.updated_at),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchMovesReq {
    pub locator: Option<String>,
    pub dod_id: Option<String>,
    pub emplid: Option<String>,
    pub customer_name: Option<String>,
    pub branch: Option<String>,
    pub status: Option<Vec<MoveStatus>>,
    pub origin_postal_code: Option<String>,
    pub destination_postal_code: Option<String>,
    pub shipments_count: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

impl SearchMovesReq {
    pub fn into_params(self, page: PageQuery) -> SearchMovesParams {
        SearchMovesParams {
            locator: self.locator,
            dod_id: self.dod_id,
            emplid: self.emplid,
            customer_name: self.customer_name,
            branch: self.branch,
            status: self.status.unwrap_or_default(),
            origin_postal_code: self.origin_postal_code,
            destination_postal_code: self.destination_postal_code,
            shipments_count: self.shipments_count,
            page: page.page,
            per_page: page.per_page,
            sort: self.sort,
            order: self.order,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchMoveCustomerDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dod_id: Option<String>,
    pub emplid: Option<String>,
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchMoveDto {
    pub id: Uuid,
    pub locator: String,
    pub status: MoveStatus,
    pub customer: SearchMoveCustomerDto,
    pub origin_duty_location_postal_code: Option<String>,
    pub destination_duty_location_postal_code: Option<String>,
    pub requested_pickup_date: Option<NaiveDate>,
    pub requested_delivery_date: Option<NaiveDate>,
    pub shipments_count: i64,
    pub locked_by_office_user_id: Option<Uuid>,
    pub lock_expires_at: Option<DateTime<Utc>>,
}

impl From<&Move> for SearchMoveDto {
    fn from(m: &Move) -> Self {
        let order = m.orders.as_ref();
        let customer = order.and_then(|o| o.customer.as_ref());
        let counted: Vec<_> = m
            .shipments
            .iter()
            .filter(|s| s.status != ShipmentStatus::Draft)
            .collect();
        // Dates come from the first shipment, and only when any counts.
        let first = if counted.is_empty() { None } else { m.shipments.first() };
        Self {
            id: m.id,
            locator: m.locator.clone(),
            status: m.status,
            customer: SearchMoveCustomerDto {
                first_name: customer.map(|c| c.first_name.clone()),
                last_name: customer.map(|c| c.last_name.clone()),
                dod_id: customer.and_then(|c| c.edipi.clone()),
                emplid: customer.and_then(|c| c.emplid.clone()),
                branch: customer.and_then(|c| c.affiliation.clone()),
            },
            origin_duty_location_postal_code: order
                .and_then(|o| o.origin_duty_location.as_ref())
                .map(|d| d.address.postal_code.clone()),
            destination_duty_location_postal_code: order
                .map(|o| o.new_duty_location.address.postal_code.clone()),
            requested_pickup_date: first.and_then(|s| s.requested_pickup_date),
            requested_delivery_date: first.and_then(|s| s.requested_delivery_date),
            shipments_count: counted.len() as i64,
            locked_by_office_user_id: m.locked_by_office_user_id,
            lock_expires_at: m.lock_expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchMovesResultDto {
    pub page: u32,
    pub per_page: u32,
    pub total_count: u64,
    pub search_moves: Vec<SearchMoveDto>,
}

impl From<&Paged<Move>> for SearchMovesResultDto {
    fn from(p: &Paged<Move>) -> Self {
        Self {
            page: p.page,
            per_page: p.per_page,
            total_count: p.total_count,
            search_moves: p.items.iter().map(SearchMoveDto::from).collect(),
        }
    }
}

/// Statuses the task-ordering queue shows when no status filter is given.
pub const DEFAULT_QUEUE_STATUSES: [MoveStatus; 3] = [
    MoveStatus::ServiceCounselingCompleted,
    MoveStatus::ApprovalsRequested,
    MoveStatus::Submitted,
];

/// Query string of `GET /queues/moves`. `status` is a comma-separated list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovesQueueQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub locator: Option<String>,
    pub edipi: Option<String>,
    pub emplid: Option<String>,
    pub customer_name: Option<String>,
    pub branch: Option<String>,
    pub status: Option<String>,
}

impl MovesQueueQuery {
    pub fn into_params(self, page: PageQuery) -> Result<SearchMovesParams, DomainError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_QUEUE_STATUSES.to_vec(),
            Some(list) => list
                .split(',')
                .map(|s| {
                    serde_json::from_value::<MoveStatus>(serde_json::Value::String(
                        s.trim().to_string(),
                    ))
                    .map_err(|_| {
                        DomainError::invalid_field("status", format!("unknown move status '{s}'"))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
        };
        Ok(SearchMovesParams {
            locator: self.locator,
            dod_id: self.edipi,
            emplid: self.emplid,
            customer_name: self.customer_name,
            branch: self.branch,
            status,
            page: page.page,
            per_page: page.per_page,
            sort: self.sort,
            order: self.order,
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueueMoveDto {
    pub id: Uuid,
    pub locator: String,
    pub status: MoveStatus,
    pub customer: SearchMoveCustomerDto,
    pub order_type: Option<OrdersType>,
    pub requested_move_date: Option<NaiveDate>,
    pub appeared_in_too_at: Option<DateTime<Utc>>,
    pub shipments_count: i64,
    pub origin_duty_location_postal_code: Option<String>,
    pub locked_by_office_user_id: Option<Uuid>,
    pub lock_expires_at: Option<DateTime<Utc>>,
}

impl From<&Move> for QueueMoveDto {
    fn from(m: &Move) -> Self {
        let summary = SearchMoveDto::from(m);
        // Earliest requested pickup among shipments that count.
        let requested_move_date = m
            .shipments
            .iter()
            .filter(|s| s.status != ShipmentStatus::Draft)
            .filter_map(|s| s.requested_pickup_date)
            .min();
        Self {
            id: m.id,
            locator: summary.locator,
            status: m.status,
            customer: summary.customer,
            order_type: m.orders_type(),
            requested_move_date,
            appeared_in_too_at: m.submitted_at,
            shipments_count: summary.shipments_count,
            origin_duty_location_postal_code: summary.origin_duty_location_postal_code,
            locked_by_office_user_id: m.locked_by_office_user_id,
            lock_expires_at: m.lock_expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueueMovesResultDto {
    pub page: u32,
    pub per_page: u32,
    pub total_count: u64,
    pub queue_moves: Vec<QueueMoveDto>,
}

impl From<&Paged<Move>> for QueueMovesResultDto {
    fn from(p: &Paged<Move>) -> Self {
        Self {
            page: p.page,
            per_page: p.per_page,
            total_count: p.total_count,
            queue_moves: p.items.iter().map(QueueMoveDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetFinancialReviewFlagReq {
    pub flag_for_review: Option<bool>,
    pub remarks: Option<String>,
}

impl SetFinancialReviewFlagReq {
    pub fn into_parts(self) -> Result<(bool, Option<String>), DomainError> {
        let flag = self
            .flag_for_review
            .ok_or_else(|| DomainError::invalid_field("flagForReview", "is required"))?;
        let remarks = self.remarks.filter(|r| !r.trim().is_empty());
        if flag && remarks.is_none() {
            return Err(DomainError::invalid_field(
                "remarks",
                "is required when flagging a move for review",
            ));
        }
        Ok((flag, remarks))
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCloseoutOfficeReq {
    pub closeout_office_id: Option<Uuid>,
}

impl UpdateCloseoutOfficeReq {
    pub fn office_id(&self) -> Result<Uuid, DomainError> {
        self.closeout_office_id
            .ok_or_else(|| DomainError::invalid_field("closeoutOfficeId", "is required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_requires_remarks_only_when_set() {
        let set = SetFinancialReviewFlagReq { flag_for_review: Some(true), remarks: None };
        assert!(set.into_parts().is_err());
        let clear = SetFinancialReviewFlagReq { flag_for_review: Some(false), remarks: None };
        assert_eq!(clear.into_parts().unwrap(), (false, None));
        assert!(SetFinancialReviewFlagReq::default().into_parts().is_err());
    }

    #[test]
    fn queue_defaults_to_actionable_statuses() {
        let page = PageQuery { page: 1, per_page: 20 };
        let params = MovesQueueQuery::default().into_params(page).unwrap();
        assert_eq!(params.status, DEFAULT_QUEUE_STATUSES.to_vec());

        let q = MovesQueueQuery {
            status: Some("APPROVED, DRAFT".into()),
            edipi: Some("1234567890".into()),
            ..Default::default()
        };
        let params = q.into_params(page).unwrap();
        assert_eq!(params.status, vec![MoveStatus::Approved, MoveStatus::Draft]);
        assert_eq!(params.dod_id.as_deref(), Some("1234567890"));

        let bad = MovesQueueQuery { status: Some("LOST".into()), ..Default::default() };
        let err = bad.into_params(page).unwrap_err();
        assert!(err.fields().unwrap().contains_key("status"));
    }
}
