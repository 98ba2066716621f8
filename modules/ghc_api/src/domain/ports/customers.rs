use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{Customer, CustomerPatch, Paged, SearchCustomersParams};
use crate::domain::error::DomainError;

#[async_trait]
pub trait CustomerFetcher: Send + Sync {
    async fn fetch_customer(&self, customer_id: Uuid) -> Result<Customer, DomainError>;
}

#[async_trait]
pub trait CustomerUpdater: Send + Sync {
    async fn update_customer(
        &self,
        customer_id: Uuid,
        patch: CustomerPatch,
        etag: &str,
    ) -> Result<Customer, DomainError>;
}

#[async_trait]
pub trait CustomerSearcher: Send + Sync {
    async fn search_customers(
        &self,
        params: &SearchCustomersParams,
    ) -> Result<Paged<Customer>, DomainError>;
}
