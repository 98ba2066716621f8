use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header::IF_MATCH, request::Parts},
};

use crate::domain::error::DomainError;

/// Raw `If-Match` header. Captured as-is and forwarded to the service layer,
/// which does the comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IfMatch(pub Option<String>);

impl IfMatch {
    /// The token, or `BadData` when the header is absent or empty.
    pub fn require(&self) -> Result<&str, DomainError> {
        match self.0.as_deref() {
            Some(t) if !t.is_empty() => Ok(t),
            _ => Err(DomainError::bad_data("If-Match header is required")),
        }
    }
}

impl<S> FromRequestParts<S> for IfMatch
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(IF_MATCH)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(Self(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn captures_header_verbatim() {
        let (mut parts, _) = Request::builder()
            .header("If-Match", "MjAyNC0wMS0wMVQwMDowMDowMFo=")
            .body(())
            .unwrap()
            .into_parts();
        let m = IfMatch::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(m.require().unwrap(), "MjAyNC0wMS0wMVQwMDowMDowMFo=");
    }

    #[test]
    fn missing_or_empty_is_bad_data() {
        assert!(IfMatch(None).require().is_err());
        assert!(IfMatch(Some(String::new())).require().is_err());
    }
}
