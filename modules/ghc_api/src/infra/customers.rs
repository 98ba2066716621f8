use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;
use uuid::Uuid;

use super::store::{check_etag, paginate, touch, InMemoryStore};
use crate::contract::model::{Customer, CustomerPatch, Paged, SearchCustomersParams, SortOrder};
use crate::domain::error::DomainError;
use crate::domain::ports::{CustomerFetcher, CustomerSearcher, CustomerUpdater};

pub struct MemCustomerService {
    store: Arc<InMemoryStore>,
}

impl MemCustomerService {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

fn matches(c: &Customer, p: &SearchCustomersParams) -> bool {
    let eq = |want: &Option<String>, have: &Option<String>| match want {
        Some(w) => have.as_deref() == Some(w.as_str()),
        None => true,
    };
    let name_hit = match &p.customer_name {
        Some(name) => {
            let needle = name.trim().to_lowercase();
            format!("{} {}", c.first_name, c.last_name)
                .to_lowercase()
                .contains(&needle)
                || format!("{}, {}", c.last_name, c.first_name)
                    .to_lowercase()
                    .contains(&needle)
        }
        None => true,
    };
    eq(&p.branch, &c.affiliation)
        && eq(&p.dod_id, &c.edipi)
        && eq(&p.emplid, &c.emplid)
        && name_hit
}

fn sort_key(c: &Customer, field: &str) -> String {
    match field {
        "dodID" => c.edipi.clone().unwrap_or_default(),
        "emplid" => c.emplid.clone().unwrap_or_default(),
        "branch" => c.affiliation.clone().unwrap_or_default(),
        "personalEmail" => c.personal_email.clone().unwrap_or_default(),
        _ => format!("{}, {}", c.last_name, c.first_name).to_lowercase(),
    }
}

#[async_trait]
impl CustomerFetcher for MemCustomerService {
    #[instrument(name = "ghc_api.service.fetch_customer", skip(self))]
    async fn fetch_customer(&self, customer_id: Uuid) -> Result<Customer, DomainError> {
        self.store
            .read()
            .customers
            .get(&customer_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Customer", customer_id))
    }
}

#[async_trait]
impl CustomerUpdater for MemCustomerService {
    #[instrument(name = "ghc_api.service.update_customer", skip(self, patch, etag))]
    async fn update_customer(
        &self,
        customer_id: Uuid,
        patch: CustomerPatch,
        etag: &str,
    ) -> Result<Customer, DomainError> {
        let mut t = self.store.write();
        let c = t
            .customers
            .get_mut(&customer_id)
            .ok_or_else(|| DomainError::not_found("Customer", customer_id))?;
        check_etag(etag, c.updated_at, "Customer", customer_id)?;

        if let Some(v) = patch.first_name {
            c.first_name = v;
        }
        if let Some(v) = patch.last_name {
            c.last_name = v;
        }
        if patch.middle_name.is_some() {
            c.middle_name = patch.middle_name;
        }
        if patch.suffix.is_some() {
            c.suffix = patch.suffix;
        }
        if patch.personal_email.is_some() {
            c.personal_email = patch.personal_email;
        }
        if patch.telephone.is_some() {
            c.telephone = patch.telephone;
        }
        if patch.secondary_telephone.is_some() {
            c.secondary_telephone = patch.secondary_telephone;
        }
        if let Some(v) = patch.phone_is_preferred {
            c.phone_is_preferred = v;
        }
        if let Some(v) = patch.email_is_preferred {
            c.email_is_preferred = v;
        }
        c.updated_at = touch(c.updated_at);
        Ok(c.clone())
    }
}

#[async_trait]
impl CustomerSearcher for MemCustomerService {
    #[instrument(name = "ghc_api.service.search_customers", skip(self, params))]
    async fn search_customers(
        &self,
        params: &SearchCustomersParams,
    ) -> Result<Paged<Customer>, DomainError> {
        let t = self.store.read();
        let mut hits: Vec<Customer> = t
            .customers
            .values()
            .filter(|c| matches(c, params))
            .cloned()
            .collect();
        let field = params.sort.as_deref().unwrap_or("");
        hits.sort_by(|a, b| {
            let ord = sort_key(a, field)
                .cmp(&sort_key(b, field))
                .then_with(|| a.id.cmp(&b.id));
            match params.order {
                Some(SortOrder::Desc) => ord.reverse(),
                _ => ord,
            }
        });
        Ok(paginate(&hits, params.page, params.per_page))
    }
}
