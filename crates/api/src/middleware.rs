use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use opsdesk_auth::{AuthError, TokenVerifier};

use crate::app::errors;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

/// Bearer-token gate in front of every protected route.
///
/// On success the verified [`opsdesk_auth::Principal`] is inserted into the
/// request extensions; handlers read it from there and never touch the raw
/// token.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token =
        extract_bearer(req.headers()).map_err(|e| errors::auth_error_response(&e))?;

    let principal = state
        .verifier
        .decode_and_validate(token, Utc::now())
        .map_err(|e| errors::auth_error_response(&e))?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::TokenRequired)?;

    let header = header.to_str().map_err(|_| AuthError::TokenRequired)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::TokenRequired)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(AuthError::TokenRequired);
    }

    Ok(token)
}
