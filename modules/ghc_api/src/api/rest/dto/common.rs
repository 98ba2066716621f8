use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::Address;
use crate::domain::etag;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressDto {
    pub id: Uuid,
    pub street_address1: String,
    pub street_address2: Option<String>,
    pub street_address3: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: Option<String>,
    pub e_tag: String,
}

impl From<&Address> for AddressDto {
    fn from(a: &Address) -> Self {
        Self {
            id: a.id,
            street_address1: a.street_address1.clone(),
            street_address2: a.street_address2.clone(),
            street_address3: a.street_address3.clone(),
            city: a.city.clone(),
            state: a.state.clone(),
            postal_code: a.postal_code.clone(),
            country: a.country.clone(),
            e_tag: etag::generate(a.updated_at),
        }
    }
}

pub(crate) fn address(a: Option<&Address>) -> Option<AddressDto> {
    a.map(AddressDto::from)
}

pub(crate) fn tag(updated_at: DateTime<Utc>) -> String {
    etag::generate(updated_at)
}

/// Resolved paging for a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub per_page: u32,
}

impl PageQuery {
    /// Page defaults to 1; per-page defaults to `default_per_page` and is
    /// clamped to `1..=max_per_page`.
    pub fn resolve(
        page: Option<u32>,
        per_page: Option<u32>,
        default_per_page: u32,
        max_per_page: u32,
    ) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(1),
            per_page: per_page
                .unwrap_or(default_per_page)
                .clamp(1, max_per_page.max(1)),
        }
    }
}
