use std::error::Error as _;

use axum::http::StatusCode;
use modkit::{Problem, ProblemResponse};
use tracing::{error, warn};

use crate::domain::error::{DomainError, ErrorKind};

const INTERNAL_DETAIL: &str = "An unexpected error occurred. Contact support with the trace id.";

/// Status, title and code for each error kind.
pub fn status_of(kind: ErrorKind) -> (StatusCode, &'static str, &'static str) {
    match kind {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "Not Found", "NOT_FOUND"),
        ErrorKind::InvalidInput => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "Unprocessable Entity",
            "INVALID_INPUT",
        ),
        ErrorKind::PreconditionFailed => (
            StatusCode::PRECONDITION_FAILED,
            "Precondition Failed",
            "PRECONDITION_FAILED",
        ),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "Conflict", "CONFLICT"),
        ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "Forbidden", "FORBIDDEN"),
        ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", "UNAUTHORIZED"),
        ErrorKind::BadData => (StatusCode::BAD_REQUEST, "Bad Request", "BAD_REQUEST"),
        ErrorKind::Query | ErrorKind::Unexpected => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
            "INTERNAL_ERROR",
        ),
    }
}

/// Turn a domain error into a problem response and log it.
///
/// 4xx errors are logged at warn with their message returned to the caller.
/// 5xx errors are logged at error (with the wrapped source, if any) and the
/// caller only sees a generic detail.
pub fn classify(
    err: &DomainError,
    operation: &str,
    instance: &str,
    trace_id: Option<&str>,
) -> ProblemResponse {
    let kind = err.kind();
    let (status, title, code) = status_of(kind);
    let trace = trace_id.unwrap_or("-");

    let detail = if status.is_server_error() {
        error!(%kind, operation, path = instance, trace_id = trace, error = %err, "request failed");
        if let Some(src) = err.source() {
            error!(operation, trace_id = trace, source = %src, "wrapped error");
        }
        INTERNAL_DETAIL.to_string()
    } else {
        warn!(%kind, operation, path = instance, trace_id = trace, error = %err, "request rejected");
        err.to_string()
    };

    // No published error-type documents: the type stays about:blank and the
    // code field carries the machine-readable kind.
    let mut problem = Problem::new(status, title, detail)
        .with_instance(instance)
        .with_code(code);
    if let Some(t) = trace_id {
        problem = problem.with_trace_id(t);
    }
    if let Some(fields) = err.fields() {
        problem = problem.with_invalid_fields(fields.clone());
    }
    problem.into()
}
