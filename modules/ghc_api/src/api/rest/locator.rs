use std::fmt;

use uuid::Uuid;

use crate::domain::error::DomainError;

const MAX_LOCATOR_LEN: usize = 16;

/// Parse a path identifier as a UUID. Empty or malformed values are
/// `BadData`; whether the resource exists is left to the service.
pub fn parse_uuid(name: &str, raw: &str) -> Result<Uuid, DomainError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::bad_data(format!("{name} must not be empty")));
    }
    Uuid::parse_str(raw)
        .map_err(|_| DomainError::bad_data(format!("{name} is not a valid UUID: {raw}")))
}

/// A short alphanumeric move code such as `ABCD1234`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveLocator(String);

impl MoveLocator {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DomainError::bad_data("locator must not be empty"));
        }
        if raw.len() > MAX_LOCATOR_LEN || !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::bad_data(format!("malformed move locator: {raw}")));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MoveLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
