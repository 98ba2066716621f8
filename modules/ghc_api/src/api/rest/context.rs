use std::future::Future;

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{request::Parts, Method},
    response::{IntoResponse, Response},
};
use modkit::{extract_trace_id, ProblemResponse};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::api::rest::error::classify;
use crate::domain::error::DomainError;
use crate::domain::session::Session;

/// Per-request context: the caller's session plus what is needed to log and
/// classify errors for this request.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub session: Session,
    pub trace_id: Option<String>,
    pub method: Method,
    pub path: String,
}

impl AppContext {
    pub fn new(session: Session, method: Method, path: impl Into<String>) -> Self {
        Self {
            session,
            trace_id: None,
            method,
            path: path.into(),
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Office user id of the caller. Sessions without one were already
    /// rejected by the guard, so a miss here is `Forbidden`.
    pub fn office_user_id(&self) -> Result<Uuid, DomainError> {
        self.session
            .office_user_id
            .ok_or_else(|| DomainError::forbidden("session has no office user"))
    }

    /// Run one handler body inside an operation span and turn any error into
    /// a classified problem response.
    pub async fn auditable<F, R>(&self, operation: &'static str, fut: F) -> Response
    where
        F: Future<Output = Result<R, DomainError>>,
        R: IntoResponse,
    {
        let span = info_span!(
            "ghc_api.handler",
            operation,
            method = %self.method,
            path = %self.path,
            trace_id = self.trace_id.as_deref().unwrap_or("-"),
        );
        match fut.instrument(span).await {
            Ok(resp) => resp.into_response(),
            Err(err) => {
                classify(&err, operation, &self.path, self.trace_id.as_deref()).into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for AppContext
where
    S: Send + Sync,
{
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Routers are nested under the base path; report the full path.
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map(|uri| uri.0.path().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());
        let trace_id = extract_trace_id(&parts.headers);

        let Some(session) = parts.extensions.get::<Session>().cloned() else {
            let err = DomainError::unauthorized("no valid session");
            return Err(classify(&err, "authenticate", &path, trace_id.as_deref()));
        };

        Ok(Self {
            session,
            trace_id,
            method: parts.method.clone(),
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::RoleType;
    use axum::http::{Request, StatusCode};

    #[tokio::test]
    async fn missing_session_is_unauthorized() {
        let (mut parts, _) = Request::builder()
            .uri("/ghc/v1/moves/ABC")
            .body(())
            .unwrap()
            .into_parts();
        let err = AppContext::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.0.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.0.instance, "/ghc/v1/moves/ABC");
    }

    #[tokio::test]
    async fn extracts_session_and_request_id() {
        let session = Session::office(Uuid::new_v4(), [RoleType::Too]);
        let (mut parts, _) = Request::builder()
            .method(Method::POST)
            .uri("/x")
            .header("x-request-id", "req-7")
            .extension(session.clone())
            .body(())
            .unwrap()
            .into_parts();
        let ctx = AppContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(ctx.session, session);
        assert_eq!(ctx.trace_id.as_deref(), Some("req-7"));
        assert_eq!(ctx.method, Method::POST);
    }

    #[tokio::test]
    async fn auditable_classifies_errors() {
        let ctx = AppContext::new(Session::office(Uuid::new_v4(), []), Method::GET, "/m");
        let resp = ctx
            .auditable("GetMove", async { Err::<(), _>(DomainError::not_found("Move", "X")) })
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
