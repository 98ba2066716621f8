//! Request bodies are read as bytes and parsed after the guard has run, so a
//! forbidden caller never gets a validation error back.

use axum::body::Bytes;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::domain::error::DomainError;

/// Parse a required JSON body. Malformed JSON is `BadData`; well-formed JSON
/// of the wrong shape is `InvalidInput`.
pub fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, DomainError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DomainError::bad_data("request body is required"));
    }
    serde_json::from_slice(body).map_err(map_json_error)
}

/// Like `parse_json`, but an empty body yields `None`.
pub fn parse_optional_json<T: DeserializeOwned>(body: &Bytes) -> Result<Option<T>, DomainError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body).map(Some).map_err(map_json_error)
}

fn map_json_error(err: serde_json::Error) -> DomainError {
    match err.classify() {
        Category::Data => {
            let msg = err.to_string();
            DomainError::invalid_field(field_of(&msg).unwrap_or("body"), msg.clone())
        }
        Category::Syntax | Category::Eof | Category::Io => {
            DomainError::bad_data(format!("malformed request body: {err}"))
        }
    }
}

/// Field named in serde messages like "missing field `status`".
fn field_of(msg: &str) -> Option<&str> {
    let start = msg.find('`')? + 1;
    let len = msg[start..].find('`')?;
    Some(&msg[start..start + len])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorKind;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Req {
        status: String,
    }

    #[test]
    fn syntax_errors_are_bad_data() {
        let err = parse_json::<Req>(&Bytes::from_static(b"{\"status\":")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadData);
    }

    #[test]
    fn shape_errors_name_the_field() {
        let err = parse_json::<Req>(&Bytes::from_static(b"{}")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.fields().unwrap().contains_key("status"));
    }

    #[test]
    fn empty_body() {
        assert_eq!(
            parse_json::<Req>(&Bytes::new()).unwrap_err().kind(),
            ErrorKind::BadData
        );
        assert!(parse_optional_json::<Req>(&Bytes::from_static(b" "))
            .unwrap()
            .is_none());
    }
}
