use axum::{http::StatusCode, response::IntoResponse, Json};

/// `201 Created` with a JSON body, for handlers that create a resource.
pub fn created_json<T: serde::Serialize>(value: T) -> impl IntoResponse {
    (StatusCode::CREATED, Json(value))
}

/// `204 No Content`, for mutations whose result the caller re-fetches.
pub fn no_content() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
