use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::contract::model::{
    Customer, Document, EvaluationReport, Move, MtoShipment, OfficeUserRef, Order, Paged,
    PaymentServiceItem, SitStatus,
};
use crate::domain::error::DomainError;
use crate::domain::etag;

/// Raw rows. Moves and orders are stored without their related records;
/// `assemble_*` joins them on read.
#[derive(Debug, Default)]
pub struct Tables {
    pub moves: HashMap<Uuid, Move>,
    pub orders: HashMap<Uuid, Order>,
    pub customers: HashMap<Uuid, Customer>,
    pub shipments: HashMap<Uuid, MtoShipment>,
    /// Soft-deleted shipments with their deletion time. Never read back by
    /// the office API.
    pub deleted_shipments: HashMap<Uuid, (DateTime<Utc>, MtoShipment)>,
    pub sit_statuses: HashMap<Uuid, SitStatus>,
    pub reports: HashMap<Uuid, EvaluationReport>,
    pub office_users: HashMap<Uuid, OfficeUserRef>,
    pub transportation_offices: HashMap<Uuid, String>,
    pub payment_service_items: HashMap<Uuid, PaymentServiceItem>,
    pub documents: HashMap<Uuid, Document>,
}

/// Table store behind one `RwLock`. Every compare-and-set runs inside a
/// single write guard, so for any token at most one writer wins.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write()
    }
}

/// Next `updated_at` for a row: now, but always strictly after `prev` so the
/// version token changes on every write.
pub fn touch(prev: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > prev {
        now
    } else {
        prev + Duration::nanoseconds(1)
    }
}

/// `PreconditionFailed` unless `token` matches the row's current version.
pub fn check_etag(
    token: &str,
    updated_at: DateTime<Utc>,
    entity: &str,
    id: impl std::fmt::Display,
) -> Result<(), DomainError> {
    if etag::matches(token, updated_at) {
        Ok(())
    } else {
        Err(DomainError::precondition_failed(entity, id))
    }
}

/// Sort by creation time, then id, for stable listings.
pub fn sort_by_created<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, Uuid)) {
    items.sort_by_key(key);
}

/// Slice one page out of an already filtered and sorted list.
pub fn paginate<T: Clone>(all: &[T], page: u32, per_page: u32) -> Paged<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let start = (page as usize - 1).saturating_mul(per_page as usize);
    Paged {
        items: all.iter().skip(start).take(per_page as usize).cloned().collect(),
        total_count: all.len() as u64,
        page,
        per_page,
    }
}

impl Tables {
    pub fn move_by_locator(&self, locator: &str) -> Result<&Move, DomainError> {
        self.moves
            .values()
            .find(|m| m.locator.eq_ignore_ascii_case(locator))
            .ok_or_else(|| DomainError::not_found("Move", locator))
    }

    pub fn move_id_by_locator(&self, locator: &str) -> Result<Uuid, DomainError> {
        self.move_by_locator(locator).map(|m| m.id)
    }

    /// Move belonging to an order.
    pub fn move_for_order(&self, order_id: Uuid) -> Result<&Move, DomainError> {
        self.moves
            .values()
            .find(|m| m.orders_id == order_id)
            .ok_or_else(|| DomainError::not_found("Move for order", order_id))
    }

    /// Shipments of a move in creation order.
    pub fn shipments_of(&self, move_id: Uuid) -> Vec<MtoShipment> {
        let mut out: Vec<MtoShipment> = self
            .shipments
            .values()
            .filter(|s| s.move_task_order_id == move_id)
            .cloned()
            .collect();
        sort_by_created(&mut out, |s| (s.created_at, s.id));
        out
    }

    /// Document with live uploads in upload order.
    pub fn assemble_document(&self, document_id: Uuid) -> Result<Document, DomainError> {
        let doc = self
            .documents
            .get(&document_id)
            .ok_or_else(|| DomainError::not_found("Document", document_id))?;
        let mut uploads: Vec<_> = doc
            .uploads
            .iter()
            .filter(|u| u.deleted_at.is_none())
            .cloned()
            .collect();
        sort_by_created(&mut uploads, |u| (u.created_at, u.id));
        Ok(Document {
            id: doc.id,
            service_member_id: doc.service_member_id,
            uploads,
        })
    }

    /// Order with its customer and owning move joined in.
    pub fn assemble_order(&self, order_id: Uuid) -> Result<Order, DomainError> {
        let mut order = self
            .orders
            .get(&order_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Order", order_id))?;
        order.customer = self.customers.get(&order.customer_id).cloned();
        if let Ok(m) = self.move_for_order(order_id) {
            order.move_code = Some(m.locator.clone());
            order.move_task_order_id = Some(m.id);
        }
        Ok(order)
    }

    /// Move with orders, customer, shipments and additional documents.
    pub fn assemble_move(&self, move_id: Uuid) -> Result<Move, DomainError> {
        let mut mv = self
            .moves
            .get(&move_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Move", move_id))?;
        mv.orders = Some(self.assemble_order(mv.orders_id)?);
        mv.shipments = self.shipments_of(mv.id);
        mv.additional_documents = match mv.additional_documents_id {
            Some(id) => Some(self.assemble_document(id)?),
            None => None,
        };
        Ok(mv)
    }
}
