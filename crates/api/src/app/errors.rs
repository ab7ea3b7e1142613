use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use opsdesk_auth::AuthError;
use opsdesk_core::DomainError;
use opsdesk_store::StoreError;

/// Render an auth failure with the status its kind demands: 401 for a
/// missing or unusable token, 403 for a verified caller without the role.
pub fn auth_error_response(err: &AuthError) -> axum::response::Response {
    match err {
        AuthError::TokenRequired => {
            json_error(StatusCode::UNAUTHORIZED, "token_required", err.to_string())
        }
        AuthError::InvalidToken => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_token", err.to_string())
        }
        AuthError::Forbidden { .. } => {
            json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string())
        }
    }
}

pub fn store_error_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn domain_error_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
