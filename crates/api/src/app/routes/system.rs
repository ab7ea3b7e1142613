use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, sse::Event as SseEvent},
};

use opsdesk_auth::Principal;

use crate::app::services::{self, AppServices};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// GET /whoami - Echo the verified principal back to the caller.
pub async fn whoami(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(serde_json::json!({
        "id": principal.id.to_string(),
        "role": principal.role.as_str(),
        "session_id": principal.session_id.to_string(),
        "expires_at": principal.expires_at,
    }))
}

/// GET /stream - Per-user realtime notification stream (SSE).
pub async fn stream(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Sse<
    impl tokio_stream::Stream<Item = Result<SseEvent, std::convert::Infallible>>,
> {
    services::user_sse_stream(services, principal.id)
}
