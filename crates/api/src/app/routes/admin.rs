//! Admin routes for user and session management.
//!
//! Every endpoint here requires the `admin` role. Updates go through
//! [`UserPatch`], so identity and credential fields can never be written
//! through this surface.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;

use opsdesk_auth::{Principal, Role, hash_password};
use opsdesk_core::{SessionId, UserId};
use opsdesk_store::{NewUser, UserPatch};

use crate::app::{errors, services::AppServices};
use crate::authz::require_role;

fn admin_only() -> [Role; 1] {
    [Role::new("admin")]
}

// ─────────────────────────────────────────────────────────────────────────────
// Request DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub display_name: String,
    pub role: Option<String>,
    pub password: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

pub fn router() -> Router {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route(
            "/users/:id",
            get(get_user).patch(patch_user).delete(delete_user),
        )
        .route("/sessions", get(list_sessions))
        .route("/sessions/:id", axum::routing::delete(delete_session))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// POST /admin/users - Create a new user
pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<CreateUserRequest>,
) -> axum::response::Response {
    if let Err(resp) = require_role(&services.policy, &principal, &admin_only()) {
        return resp;
    }

    let email = body.email.trim();
    if email.is_empty() || !email.contains('@') {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "email must contain '@'",
        );
    }
    if body.display_name.trim().is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "display_name must not be empty",
        );
    }
    if body.password.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "password must not be empty",
        );
    }

    let password_hash = match hash_password(&body.password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("password hashing failed: {e}");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "hash_error",
                "failed to hash password",
            );
        }
    };

    let new = NewUser {
        email: body.email,
        display_name: body.display_name,
        role: Role::new(body.role.unwrap_or_else(|| "user".to_string())),
        password_hash,
    };

    match services.users.create(new, Utc::now()) {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => errors::store_error_response(e),
    }
}

/// GET /admin/users - List all users
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    if let Err(resp) = require_role(&services.policy, &principal, &admin_only()) {
        return resp;
    }

    let users = services.users.list();
    (StatusCode::OK, Json(serde_json::json!({ "items": users }))).into_response()
}

/// GET /admin/users/:id - Get a specific user
pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require_role(&services.policy, &principal, &admin_only()) {
        return resp;
    }

    let user_id: UserId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_response(e),
    };

    match services.users.get(&user_id) {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => errors::store_error_response(e),
    }
}

/// PATCH /admin/users/:id - Update display name and/or role
pub async fn patch_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> axum::response::Response {
    if let Err(resp) = require_role(&services.policy, &principal, &admin_only()) {
        return resp;
    }

    let user_id: UserId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_response(e),
    };

    if let Some(name) = &patch.display_name {
        if name.trim().is_empty() {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "validation_error",
                "display_name must not be empty",
            );
        }
    }

    match services.users.update(&user_id, &patch, Utc::now()) {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => errors::store_error_response(e),
    }
}

/// DELETE /admin/users/:id - Remove a user
pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require_role(&services.policy, &principal, &admin_only()) {
        return resp;
    }

    let user_id: UserId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_response(e),
    };

    match services.users.remove(&user_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_response(e),
    }
}

/// GET /admin/sessions - List sessions with an active count
pub async fn list_sessions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    if let Err(resp) = require_role(&services.policy, &principal, &admin_only()) {
        return resp;
    }

    let sessions = services.sessions.list();
    let active = services.sessions.active(Utc::now()).len();
    (
        StatusCode::OK,
        Json(serde_json::json!({ "items": sessions, "active": active })),
    )
        .into_response()
}

/// DELETE /admin/sessions/:id - Drop a session's bookkeeping record
pub async fn delete_session(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require_role(&services.policy, &principal, &admin_only()) {
        return resp;
    }

    let session_id: SessionId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_response(e),
    };

    match services.sessions.remove(&session_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_response(e),
    }
}
