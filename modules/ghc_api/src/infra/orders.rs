use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use super::store::{check_etag, touch, InMemoryStore, Tables};
use crate::contract::model::{
    AllowancePatch, CounselingOrderPatch, Entitlement, Move, Order, OrderPatch,
};
use crate::domain::error::DomainError;
use crate::domain::ports::{ExcessWeightRiskManager, OrderFetcher, OrderUpdater};

pub struct MemOrderService {
    store: Arc<InMemoryStore>,
}

impl MemOrderService {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

/// Compare the order's version token, apply `op` to the stored order and
/// return the assembled order together with its move id.
fn update_order(
    t: &mut Tables,
    order_id: Uuid,
    etag: &str,
    op: impl FnOnce(&mut Order) -> Result<(), DomainError>,
) -> Result<(Order, Uuid), DomainError> {
    let move_id = t.move_for_order(order_id)?.id;
    let order = t
        .orders
        .get_mut(&order_id)
        .ok_or_else(|| DomainError::not_found("Order", order_id))?;
    check_etag(etag, order.updated_at, "Order", order_id)?;
    op(order)?;
    order.updated_at = touch(order.updated_at);
    Ok((t.assemble_order(order_id)?, move_id))
}

fn entitlement_of(order: &mut Order) -> Result<&mut Entitlement, DomainError> {
    let id = order.id;
    order
        .entitlement
        .as_mut()
        .ok_or_else(|| DomainError::not_found("Entitlement for order", id))
}

fn apply_allowance(order: &mut Order, patch: AllowancePatch) -> Result<(), DomainError> {
    let grade = patch.grade;
    let ent = entitlement_of(order)?;
    if let Some(v) = patch.dependents_authorized {
        ent.dependents_authorized = Some(v);
    }
    if let Some(v) = patch.pro_gear_weight {
        ent.pro_gear_weight = v;
    }
    if let Some(v) = patch.pro_gear_weight_spouse {
        ent.pro_gear_weight_spouse = v;
    }
    if let Some(v) = patch.required_medical_equipment_weight {
        ent.required_medical_equipment_weight = v;
    }
    if let Some(v) = patch.organizational_clothing_and_individual_equipment {
        ent.organizational_clothing_and_individual_equipment = v;
    }
    if let Some(v) = patch.storage_in_transit {
        ent.storage_in_transit = Some(v);
    }
    if let Some(v) = patch.gun_safe {
        ent.gun_safe = v;
    }
    ent.updated_at = touch(ent.updated_at);
    if grade.is_some() {
        order.grade = grade;
    }
    Ok(())
}

fn set_authorized_weight(order: &mut Order, weight: i64) -> Result<(), DomainError> {
    let ent = entitlement_of(order)?;
    ent.authorized_weight = Some(weight);
    ent.updated_at = touch(ent.updated_at);
    Ok(())
}

#[async_trait]
impl OrderFetcher for MemOrderService {
    #[instrument(name = "ghc_api.service.fetch_order", skip(self))]
    async fn fetch_order(&self, order_id: Uuid) -> Result<Order, DomainError> {
        self.store.read().assemble_order(order_id)
    }
}

#[async_trait]
impl OrderUpdater for MemOrderService {
    #[instrument(name = "ghc_api.service.update_order_as_too", skip(self, etag, patch))]
    async fn update_order_as_too(
        &self,
        order_id: Uuid,
        etag: &str,
        patch: OrderPatch,
    ) -> Result<(Order, Uuid), DomainError> {
        update_order(&mut self.store.write(), order_id, etag, |o| {
            o.issue_date = patch.issue_date;
            o.report_by_date = patch.report_by_date;
            o.orders_type = patch.orders_type;
            o.orders_type_detail = patch.orders_type_detail;
            o.orders_number = patch.orders_number;
            o.grade = patch.grade.or(o.grade.take());
            o.department_indicator = patch.department_indicator;
            o.tac = patch.tac;
            o.sac = patch.sac;
            o.nts_tac = patch.nts_tac;
            o.nts_sac = patch.nts_sac;
            Ok(())
        })
    }

    #[instrument(name = "ghc_api.service.update_order_as_counselor", skip(self, etag, patch))]
    async fn update_order_as_counselor(
        &self,
        order_id: Uuid,
        etag: &str,
        patch: CounselingOrderPatch,
    ) -> Result<(Order, Uuid), DomainError> {
        update_order(&mut self.store.write(), order_id, etag, |o| {
            o.issue_date = patch.issue_date;
            o.report_by_date = patch.report_by_date;
            o.orders_type = patch.orders_type;
            if patch.grade.is_some() {
                o.grade = patch.grade;
            }
            Ok(())
        })
    }

    #[instrument(name = "ghc_api.service.update_allowance_as_too", skip(self, etag, patch))]
    async fn update_allowance_as_too(
        &self,
        order_id: Uuid,
        etag: &str,
        patch: AllowancePatch,
    ) -> Result<(Order, Uuid), DomainError> {
        update_order(&mut self.store.write(), order_id, etag, |o| {
            apply_allowance(o, patch)
        })
    }

    #[instrument(
        name = "ghc_api.service.update_allowance_as_counselor",
        skip(self, etag, patch)
    )]
    async fn update_allowance_as_counselor(
        &self,
        order_id: Uuid,
        etag: &str,
        patch: AllowancePatch,
    ) -> Result<(Order, Uuid), DomainError> {
        update_order(&mut self.store.write(), order_id, etag, |o| {
            apply_allowance(o, patch)
        })
    }
}

#[async_trait]
impl ExcessWeightRiskManager for MemOrderService {
    #[instrument(name = "ghc_api.service.acknowledge_excess_weight_risk", skip(self, etag))]
    async fn acknowledge_excess_weight_risk(
        &self,
        order_id: Uuid,
        etag: &str,
    ) -> Result<Move, DomainError> {
        let mut t = self.store.write();
        let move_id = t.move_for_order(order_id)?.id;
        let mv = t
            .moves
            .get_mut(&move_id)
            .ok_or_else(|| DomainError::not_found("Move", move_id))?;
        check_etag(etag, mv.updated_at, "Move", move_id)?;
        if mv.excess_weight_acknowledged_at.is_none() {
            mv.excess_weight_acknowledged_at = Some(Utc::now());
            mv.updated_at = touch(mv.updated_at);
        }
        t.assemble_move(move_id)
    }

    #[instrument(name = "ghc_api.service.update_billable_weight", skip(self, etag))]
    async fn update_billable_weight(
        &self,
        order_id: Uuid,
        weight: i64,
        etag: &str,
    ) -> Result<(Order, Uuid), DomainError> {
        update_order(&mut self.store.write(), order_id, etag, |o| {
            set_authorized_weight(o, weight)
        })
    }

    #[instrument(
        name = "ghc_api.service.update_max_billable_weight_as_tio",
        skip(self, remarks, etag)
    )]
    async fn update_max_billable_weight_as_tio(
        &self,
        order_id: Uuid,
        weight: i64,
        remarks: String,
        etag: &str,
    ) -> Result<(Order, Uuid), DomainError> {
        let mut t = self.store.write();
        let (order, move_id) = update_order(&mut t, order_id, etag, |o| {
            set_authorized_weight(o, weight)
        })?;
        if let Some(mv) = t.moves.get_mut(&move_id) {
            mv.tio_remarks = Some(remarks);
            mv.updated_at = touch(mv.updated_at);
        }
        Ok((order, move_id))
    }
}
