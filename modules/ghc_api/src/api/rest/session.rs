use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::domain::ports::SessionResolver;
use crate::domain::session::Session;

/// Resolve `Authorization: Bearer <token>` into a `Session` request
/// extension. Requests without a resolvable token pass through untouched and
/// are rejected with 401 when a handler extracts its context.
pub async fn attach_session(
    State(resolver): State<Arc<dyn SessionResolver>>,
    mut req: Request,
    next: Next,
) -> Response {
    if req.extensions().get::<Session>().is_none() {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string());
        if let Some(token) = token {
            match resolver.resolve(&token).await {
                Some(session) => {
                    req.extensions_mut().insert(session);
                }
                None => debug!("bearer token did not resolve to a session"),
            }
        }
    }
    next.run(req).await
}
