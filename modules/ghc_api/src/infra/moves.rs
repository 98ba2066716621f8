use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::store::{check_etag, paginate, touch, InMemoryStore, Tables};
use crate::contract::model::{
    Move, MoveStatus, Paged, SearchMovesParams, ShipmentStatus, SortOrder,
};
use crate::domain::error::DomainError;
use crate::domain::ports::{
    MoveCanceler, MoveCloseoutOfficeUpdater, MoveFetcher, MoveFinancialReviewFlagSetter,
    MoveLocker, MoveSearcher,
};

pub struct MemMoveService {
    store: Arc<InMemoryStore>,
}

impl MemMoveService {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

fn matches_filters(t: &Tables, m: &Move, p: &SearchMovesParams) -> bool {
    let order = t.orders.get(&m.orders_id);
    let customer = order.and_then(|o| t.customers.get(&o.customer_id));

    if let Some(loc) = &p.locator {
        if !m.locator.eq_ignore_ascii_case(loc.trim()) {
            return false;
        }
    }
    if let Some(dod_id) = &p.dod_id {
        if customer.and_then(|c| c.edipi.as_deref()) != Some(dod_id.as_str()) {
            return false;
        }
    }
    if let Some(emplid) = &p.emplid {
        if customer.and_then(|c| c.emplid.as_deref()) != Some(emplid.as_str()) {
            return false;
        }
    }
    if let Some(name) = &p.customer_name {
        let needle = name.trim().to_lowercase();
        let hit = customer.is_some_and(|c| {
            format!("{} {}", c.first_name, c.last_name)
                .to_lowercase()
                .contains(&needle)
                || format!("{}, {}", c.last_name, c.first_name)
                    .to_lowercase()
                    .contains(&needle)
        });
        if !hit {
            return false;
        }
    }
    if let Some(branch) = &p.branch {
        if customer.and_then(|c| c.affiliation.as_deref()) != Some(branch.as_str()) {
            return false;
        }
    }
    if !p.status.is_empty() && !p.status.contains(&m.status) {
        return false;
    }
    if let Some(zip) = &p.origin_postal_code {
        let origin = order
            .and_then(|o| o.origin_duty_location.as_ref())
            .map(|d| d.address.postal_code.as_str());
        if origin != Some(zip.as_str()) {
            return false;
        }
    }
    if let Some(zip) = &p.destination_postal_code {
        if order.map(|o| o.new_duty_location.address.postal_code.as_str()) != Some(zip.as_str()) {
            return false;
        }
    }
    if let Some(count) = p.shipments_count {
        let n = t
            .shipments
            .values()
            .filter(|s| s.move_task_order_id == m.id && s.status != ShipmentStatus::Draft)
            .count() as i64;
        if n != count {
            return false;
        }
    }
    true
}

fn sort_key(t: &Tables, m: &Move, field: &str) -> String {
    let customer = t
        .orders
        .get(&m.orders_id)
        .and_then(|o| t.customers.get(&o.customer_id));
    match field {
        "locator" => m.locator.clone(),
        "status" => format!("{:?}", m.status),
        "customerName" => customer
            .map(|c| format!("{}, {}", c.last_name, c.first_name))
            .unwrap_or_default(),
        "dodID" => customer.and_then(|c| c.edipi.clone()).unwrap_or_default(),
        "branch" => customer.and_then(|c| c.affiliation.clone()).unwrap_or_default(),
        _ => String::new(),
    }
}

#[async_trait]
impl MoveFetcher for MemMoveService {
    #[instrument(name = "ghc_api.service.fetch_move", skip(self))]
    async fn fetch_move(&self, locator: &str) -> Result<Move, DomainError> {
        let t = self.store.read();
        let id = t.move_id_by_locator(locator)?;
        t.assemble_move(id)
    }
}

#[async_trait]
impl MoveSearcher for MemMoveService {
    #[instrument(name = "ghc_api.service.search_moves", skip(self, params), fields(page = params.page))]
    async fn search_moves(&self, params: &SearchMovesParams) -> Result<Paged<Move>, DomainError> {
        let t = self.store.read();
        let mut hits: Vec<&Move> = t
            .moves
            .values()
            .filter(|m| matches_filters(&t, m, params))
            .collect();

        let field = params.sort.as_deref().unwrap_or("");
        hits.sort_by(|a, b| {
            let by_field = sort_key(&t, a, field).cmp(&sort_key(&t, b, field));
            let ord = by_field.then_with(|| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
            match params.order {
                Some(SortOrder::Desc) => ord.reverse(),
                _ => ord,
            }
        });

        let ids: Vec<Uuid> = hits.iter().map(|m| m.id).collect();
        let page = paginate(&ids, params.page, params.per_page);
        let items = page
            .items
            .iter()
            .map(|id| t.assemble_move(*id))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(total = page.total_count, "move search finished");
        Ok(Paged {
            items,
            total_count: page.total_count,
            page: page.page,
            per_page: page.per_page,
        })
    }
}

#[async_trait]
impl MoveLocker for MemMoveService {
    #[instrument(name = "ghc_api.service.lock_move", skip(self))]
    async fn lock_move(
        &self,
        move_id: Uuid,
        office_user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Move, DomainError> {
        let mut t = self.store.write();
        let mv = t
            .moves
            .get_mut(&move_id)
            .ok_or_else(|| DomainError::not_found("Move", move_id))?;
        // First holder wins until expiry; the check runs under the same guard
        // as the write. Locking leaves the version token alone.
        if mv.has_live_lock(Utc::now()) {
            debug!(move_id = %move_id, "move already locked");
        } else {
            mv.locked_by_office_user_id = Some(office_user_id);
            mv.lock_expires_at = Some(expires_at);
        }
        t.assemble_move(move_id)
    }

    #[instrument(name = "ghc_api.service.unlock_moves", skip(self))]
    async fn unlock_moves_for(&self, office_user_id: Uuid) -> Result<usize, DomainError> {
        let mut t = self.store.write();
        let mut n = 0;
        for mv in t
            .moves
            .values_mut()
            .filter(|m| m.locked_by_office_user_id == Some(office_user_id))
        {
            mv.locked_by_office_user_id = None;
            mv.lock_expires_at = None;
            n += 1;
        }
        Ok(n)
    }
}

#[async_trait]
impl MoveFinancialReviewFlagSetter for MemMoveService {
    #[instrument(name = "ghc_api.service.set_financial_review_flag", skip(self, etag, remarks))]
    async fn set_financial_review_flag(
        &self,
        move_id: Uuid,
        etag: &str,
        flag: bool,
        remarks: Option<String>,
    ) -> Result<Move, DomainError> {
        let mut t = self.store.write();
        let mv = t
            .moves
            .get_mut(&move_id)
            .ok_or_else(|| DomainError::not_found("Move", move_id))?;
        check_etag(etag, mv.updated_at, "Move", move_id)?;
        mv.financial_review_flag = flag;
        mv.financial_review_remarks = if flag { remarks } else { None };
        mv.updated_at = touch(mv.updated_at);
        t.assemble_move(move_id)
    }
}

#[async_trait]
impl MoveCloseoutOfficeUpdater for MemMoveService {
    #[instrument(name = "ghc_api.service.update_closeout_office", skip(self, etag))]
    async fn update_closeout_office(
        &self,
        locator: &str,
        closeout_office_id: Uuid,
        etag: &str,
    ) -> Result<Move, DomainError> {
        let mut t = self.store.write();
        if !t.transportation_offices.contains_key(&closeout_office_id) {
            return Err(DomainError::not_found("Transportation office", closeout_office_id));
        }
        let move_id = t.move_id_by_locator(locator)?;
        let mv = t
            .moves
            .get_mut(&move_id)
            .ok_or_else(|| DomainError::not_found("Move", locator))?;
        check_etag(etag, mv.updated_at, "Move", locator)?;
        mv.closeout_office_id = Some(closeout_office_id);
        mv.updated_at = touch(mv.updated_at);
        t.assemble_move(move_id)
    }
}

#[async_trait]
impl MoveCanceler for MemMoveService {
    #[instrument(name = "ghc_api.service.cancel_move", skip(self))]
    async fn cancel_move(&self, move_id: Uuid) -> Result<Move, DomainError> {
        let mut t = self.store.write();
        let mv = t
            .moves
            .get_mut(&move_id)
            .ok_or_else(|| DomainError::not_found("Move", move_id))?;
        match mv.status {
            MoveStatus::Canceled => {
                return Err(DomainError::conflict("move is already canceled"));
            }
            MoveStatus::Approved | MoveStatus::ApprovalsRequested => {
                return Err(DomainError::conflict(
                    "approved moves cannot be canceled by an office user",
                ));
            }
            _ => {}
        }
        mv.status = MoveStatus::Canceled;
        mv.updated_at = touch(mv.updated_at);

        for s in t
            .shipments
            .values_mut()
            .filter(|s| s.move_task_order_id == move_id)
        {
            s.status = ShipmentStatus::Canceled;
            s.updated_at = touch(s.updated_at);
        }
        t.assemble_move(move_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::seed::{demo_data, DEMO_MOVE_ID};
    use crate::infra::storage::LocalFileStorer;
    use chrono::Duration;

    fn seeded() -> MemMoveService {
        let store = Arc::new(InMemoryStore::new());
        let storer = LocalFileStorer::new("http://x", "s", 60).unwrap();
        demo_data(&store, &storer);
        MemMoveService::new(store)
    }

    #[tokio::test]
    async fn live_lock_is_not_taken_over() {
        let svc = seeded();
        let (first, second) = (Uuid::new_v4(), Uuid::new_v4());
        let until = Utc::now() + Duration::minutes(15);

        let mv = svc.lock_move(DEMO_MOVE_ID, first, until).await.unwrap();
        assert_eq!(mv.locked_by_office_user_id, Some(first));

        let mv = svc.lock_move(DEMO_MOVE_ID, second, until).await.unwrap();
        assert_eq!(mv.locked_by_office_user_id, Some(first));

        assert_eq!(svc.unlock_moves_for(first).await.unwrap(), 1);
        let mv = svc.lock_move(DEMO_MOVE_ID, second, until).await.unwrap();
        assert_eq!(mv.locked_by_office_user_id, Some(second));
    }

    #[tokio::test]
    async fn expired_lock_is_replaced() {
        let svc = seeded();
        let (first, second) = (Uuid::new_v4(), Uuid::new_v4());

        svc.lock_move(DEMO_MOVE_ID, first, Utc::now() - Duration::seconds(1))
            .await
            .unwrap();
        let mv = svc
            .lock_move(DEMO_MOVE_ID, second, Utc::now() + Duration::minutes(15))
            .await
            .unwrap();
        assert_eq!(mv.locked_by_office_user_id, Some(second));
    }
}
