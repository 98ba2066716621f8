use axum::http::HeaderMap;

/// Correlation id for a request: `x-trace-id`, then `x-request-id`, then
/// `traceparent`, then the id of the current tracing span.
pub fn extract_trace_id(headers: &HeaderMap) -> Option<String> {
    ["x-trace-id", "x-request-id", "traceparent"]
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| {
            tracing::Span::current()
                .id()
                .map(|id| id.into_u64().to_string())
        })
}
