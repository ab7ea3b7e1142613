//! Login and logout.
//!
//! `/auth/login` is the only credentialed endpoint outside the bearer-token
//! gate; logout runs behind it like every other protected route.

use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde::Deserialize;

use opsdesk_auth::{Principal, verify_password};

use crate::app::{errors, services::AppServices};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - Exchange credentials for a session token.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<LoginRequest>,
) -> axum::response::Response {
    // One failure shape for unknown email and wrong password alike.
    let Some(user) = services.users.find_by_email(&body.email) else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid email or password",
        );
    };
    if !verify_password(&body.password, &user.password_hash) {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid email or password",
        );
    }

    let now = Utc::now();
    let session = match services.sessions.create(user.id, now, services.token_ttl) {
        Ok(s) => s,
        Err(e) => return errors::store_error_response(e),
    };

    let token = match services.verifier.issue(
        user.id,
        user.role.clone(),
        session.id,
        now,
        services.token_ttl,
    ) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("token signing failed: {e}");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_issue",
                "failed to issue token",
            );
        }
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "token": token,
            "expires_at": session.expires_at,
            "user": user,
        })),
    )
        .into_response()
}

/// POST /auth/logout - Drop this session's bookkeeping record.
///
/// The token itself stays valid until it expires; verification never consults
/// the session store.
pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    match services.sessions.remove(&principal.session_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_response(e),
    }
}
