use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{address, tag, AddressDto};
use crate::contract::model::{
    Customer, CustomerPatch, Paged, SearchCustomersParams, SortOrder,
};
use crate::domain::error::{DomainError, FieldErrors};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub suffix: Option<String>,
    pub agency: Option<String>,
    pub edipi: Option<String>,
    pub emplid: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub secondary_telephone: Option<String>,
    pub phone_is_preferred: bool,
    pub email_is_preferred: bool,
    pub current_address: Option<AddressDto>,
    pub backup_address: Option<AddressDto>,
    pub cac_validated: bool,
    pub e_tag: String,
}

impl From<&Customer> for CustomerDto {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id,
            user_id: c.user_id,
            first_name: c.first_name.clone(),
            middle_name: c.middle_name.clone(),
            last_name: c.last_name.clone(),
            suffix: c.suffix.clone(),
            agency: c.affiliation.clone(),
            edipi: c.edipi.clone(),
            emplid: c.emplid.clone(),
            email: c.personal_email.clone(),
            phone: c.telephone.clone(),
            secondary_telephone: c.secondary_telephone.clone(),
            phone_is_preferred: c.phone_is_preferred,
            email_is_preferred: c.email_is_preferred,
            current_address: address(c.residential_address.as_ref()),
            backup_address: address(c.backup_mailing_address.as_ref()),
            cac_validated: c.cac_validated,
            e_tag: tag(c.updated_at),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerReq {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub suffix: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub secondary_telephone: Option<String>,
    pub phone_is_preferred: Option<bool>,
    pub email_is_preferred: Option<bool>,
}

impl UpdateCustomerReq {
    pub fn into_patch(self) -> Result<CustomerPatch, DomainError> {
        let mut errs = FieldErrors::new();
        if let Some(n) = &self.first_name {
            errs.check(!n.trim().is_empty(), "firstName", "must not be blank");
        }
        if let Some(n) = &self.last_name {
            errs.check(!n.trim().is_empty(), "lastName", "must not be blank");
        }
        if let Some(e) = &self.email {
            errs.check(e.contains('@'), "email", "is not a valid email address");
        }
        errs.into_result()?;
        Ok(CustomerPatch {
            first_name: self.first_name,
            middle_name: self.middle_name,
            last_name: self.last_name,
            suffix: self.suffix,
            personal_email: self.email,
            telephone: self.phone,
            secondary_telephone: self.secondary_telephone,
            phone_is_preferred: self.phone_is_preferred,
            email_is_preferred: self.email_is_preferred,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchCustomersReq {
    pub branch: Option<String>,
    pub dod_id: Option<String>,
    pub emplid: Option<String>,
    pub customer_name: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

impl SearchCustomersReq {
    pub fn into_params(self, page: super::PageQuery) -> SearchCustomersParams {
        SearchCustomersParams {
            branch: self.branch,
            dod_id: self.dod_id,
            emplid: self.emplid,
            customer_name: self.customer_name,
            page: page.page,
            per_page: page.per_page,
            sort: self.sort,
            order: self.order,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchCustomerDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub dod_id: Option<String>,
    pub emplid: Option<String>,
    pub branch: Option<String>,
    pub personal_email: Option<String>,
    pub telephone: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchCustomersResultDto {
    pub page: u32,
    pub per_page: u32,
    pub total_count: u64,
    pub search_customers: Vec<SearchCustomerDto>,
}

impl From<&Paged<Customer>> for SearchCustomersResultDto {
    fn from(p: &Paged<Customer>) -> Self {
        Self {
            page: p.page,
            per_page: p.per_page,
            total_count: p.total_count,
            search_customers: p
                .items
                .iter()
                .map(|c| SearchCustomerDto {
                    id: c.id,
                    first_name: c.first_name.clone(),
                    last_name: c.last_name.clone(),
                    dod_id: c.edipi.clone(),
                    emplid: c.emplid.clone(),
                    branch: c.affiliation.clone(),
                    personal_email: c.personal_email.clone(),
                    telephone: c.telephone.clone(),
                })
                .collect(),
        }
    }
}
