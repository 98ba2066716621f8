use axum::{
    http::{StatusCode, Uri},
    response::Json,
};
use modkit::{Problem, ProblemResponse};
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Problem+JSON 404 for paths no module registered.
pub async fn route_not_found(uri: Uri) -> ProblemResponse {
    Problem::new(
        StatusCode::NOT_FOUND,
        "Not Found",
        format!("No route for {}", uri.path()),
    )
    .with_instance(uri.path())
    .with_code("ROUTE_NOT_FOUND")
    .into()
}
