use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors reported by the service layer and the request pipeline.
///
/// Every variant maps to exactly one HTTP status; see
/// `api::rest::error::classify`.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    InvalidInput {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    #[error("{message}")]
    PreconditionFailed { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    Forbidden { message: String },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    BadData { message: String },

    #[error("query failed: {message}")]
    Query {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("unexpected: {message}")]
    Unexpected {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    PreconditionFailed,
    Conflict,
    Forbidden,
    Unauthorized,
    BadData,
    Query,
    Unexpected,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::PreconditionFailed => "precondition_failed",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::BadData => "bad_data",
            ErrorKind::Query => "query",
            ErrorKind::Unexpected => "unexpected",
        };
        f.write_str(s)
    }
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::InvalidInput { .. } => ErrorKind::InvalidInput,
            DomainError::PreconditionFailed { .. } => ErrorKind::PreconditionFailed,
            DomainError::Conflict { .. } => ErrorKind::Conflict,
            DomainError::Forbidden { .. } => ErrorKind::Forbidden,
            DomainError::Unauthorized { .. } => ErrorKind::Unauthorized,
            DomainError::BadData { .. } => ErrorKind::BadData,
            DomainError::Query { .. } => ErrorKind::Query,
            DomainError::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }

    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            message: format!("{entity} not found: {id}"),
        }
    }

    pub fn not_found_msg(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Validation failure on a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        let message = message.into();
        let mut fields = BTreeMap::new();
        fields.insert(field.clone(), vec![message.clone()]);
        Self::InvalidInput {
            message: format!("{field}: {message}"),
            fields,
        }
    }

    pub fn invalid_fields(
        message: impl Into<String>,
        fields: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self::InvalidInput {
            message: message.into(),
            fields,
        }
    }

    pub fn precondition_failed(entity: &str, id: impl fmt::Display) -> Self {
        Self::PreconditionFailed {
            message: format!("{entity} {id} was modified since it was read"),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn bad_data(message: impl Into<String>) -> Self {
        Self::BadData {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
            source: None,
        }
    }

    pub fn query_from(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Query {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
            source: None,
        }
    }

    pub fn unexpected_from(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Unexpected {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Field-level validation messages, if any.
    pub fn fields(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            DomainError::InvalidInput { fields, .. } => Some(fields),
            _ => None,
        }
    }
}

/// Collects per-field validation messages and turns them into one
/// `InvalidInput` error.
#[derive(Debug, Default)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    /// Record "is required" for `field` when `value` is absent.
    pub fn required<T>(&mut self, value: Option<T>, field: &str) -> Option<T> {
        if value.is_none() {
            self.add(field, "is required");
        }
        value
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_error(self) -> DomainError {
        let names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        let message = format!("invalid fields: {}", names.join(", "));
        DomainError::invalid_fields(message, self.fields)
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        if self.fields.is_empty() {
            return Ok(());
        }
        Err(self.into_error())
    }
}
