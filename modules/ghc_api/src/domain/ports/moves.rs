use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::contract::model::{Move, Paged, SearchMovesParams};
use crate::domain::error::DomainError;

#[async_trait]
pub trait MoveFetcher: Send + Sync {
    /// Move by locator, with orders, customer, shipments and additional
    /// documents populated.
    async fn fetch_move(&self, locator: &str) -> Result<Move, DomainError>;
}

#[async_trait]
pub trait MoveSearcher: Send + Sync {
    async fn search_moves(&self, params: &SearchMovesParams) -> Result<Paged<Move>, DomainError>;
}

#[async_trait]
pub trait MoveLocker: Send + Sync {
    /// Lock the move for `office_user_id` until `expires_at` unless another
    /// live lock is already held, in which case the move comes back with the
    /// existing holder. Does not change the move's version token.
    async fn lock_move(
        &self,
        move_id: Uuid,
        office_user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<Move, DomainError>;

    /// Release every lock held by `office_user_id`; returns how many moves were
    /// unlocked.
    async fn unlock_moves_for(&self, office_user_id: Uuid) -> Result<usize, DomainError>;
}

#[async_trait]
pub trait MoveFinancialReviewFlagSetter: Send + Sync {
    async fn set_financial_review_flag(
        &self,
        move_id: Uuid,
        etag: &str,
        flag: bool,
        remarks: Option<String>,
    ) -> Result<Move, DomainError>;
}

#[async_trait]
pub trait MoveCloseoutOfficeUpdater: Send + Sync {
    async fn update_closeout_office(
        &self,
        locator: &str,
        closeout_office_id: Uuid,
        etag: &str,
    ) -> Result<Move, DomainError>;
}

#[async_trait]
pub trait MoveCanceler: Send + Sync {
    async fn cancel_move(&self, move_id: Uuid) -> Result<Move, DomainError>;
}
