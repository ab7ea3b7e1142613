//! Dashboard analytics computed over the in-memory stores on demand.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Json, Router, extract::Extension, http::StatusCode, response::IntoResponse, routing::get,
};
use chrono::Utc;

use opsdesk_auth::{Principal, Role};

use crate::app::services::AppServices;
use crate::authz::require_role;

pub fn router() -> Router {
    Router::new().route("/summary", get(summary))
}

/// GET /dashboard/summary - Aggregate counts for the landing page
pub async fn summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    if let Err(resp) = require_role(&services.policy, &principal, &[Role::new("agent")]) {
        return resp;
    }

    let users = services.users.list();
    let mut users_by_role: BTreeMap<String, usize> = BTreeMap::new();
    for user in &users {
        *users_by_role
            .entry(user.role.as_str().to_string())
            .or_default() += 1;
    }

    let tickets = services.tickets.list();
    let mut tickets_by_status: BTreeMap<String, usize> = BTreeMap::new();
    for ticket in &tickets {
        *tickets_by_status
            .entry(ticket.status.to_string())
            .or_default() += 1;
    }

    // The list is oldest-first; surface the newest few.
    let recent_tickets: Vec<_> = tickets.iter().rev().take(5).cloned().collect();

    let active_sessions = services.sessions.active(Utc::now()).len();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "users": { "total": users.len(), "by_role": users_by_role },
            "tickets": { "total": tickets.len(), "by_status": tickets_by_status },
            "sessions": { "active": active_sessions },
            "recent_tickets": recent_tickets,
        })),
    )
        .into_response()
}
