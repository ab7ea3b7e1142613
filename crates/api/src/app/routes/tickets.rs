//! Ticket routes.
//!
//! Users open tickets; agents work them. The admin role passes every check
//! through the shared access policy, so it is not listed per route.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use opsdesk_auth::{Principal, Role};
use opsdesk_core::TicketId;
use opsdesk_notify::Notification;
use opsdesk_store::{NewTicket, TicketPatch, TicketRecord};

use crate::app::{errors, services::AppServices};
use crate::authz::require_role;

fn readers() -> [Role; 2] {
    [Role::new("user"), Role::new("agent")]
}

fn openers() -> [Role; 1] {
    [Role::new("user")]
}

fn agents() -> [Role; 1] {
    [Role::new("agent")]
}

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_ticket).get(list_tickets))
        .route(
            "/:id",
            get(get_ticket).patch(patch_ticket).delete(delete_ticket),
        )
}

/// POST /tickets - Open a ticket on behalf of the caller
pub async fn create_ticket(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<NewTicket>,
) -> axum::response::Response {
    if let Err(resp) = require_role(&services.policy, &principal, &openers()) {
        return resp;
    }

    if body.title.trim().is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "title must not be empty",
        );
    }

    let ticket = match services.tickets.create(principal.id, body, Utc::now()) {
        Ok(t) => t,
        Err(e) => return errors::store_error_response(e),
    };

    services.dispatcher.dispatch(Notification {
        recipient: ticket.opened_by,
        topic: "ticket.created".to_string(),
        subject: format!("Ticket opened: {}", ticket.title),
        payload: serde_json::json!({
            "ticket_id": ticket.id,
            "title": ticket.title,
            "status": ticket.status,
        }),
    });

    (StatusCode::CREATED, Json(ticket)).into_response()
}

/// GET /tickets - List all tickets
pub async fn list_tickets(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    if let Err(resp) = require_role(&services.policy, &principal, &readers()) {
        return resp;
    }

    let tickets = services.tickets.list();
    (StatusCode::OK, Json(serde_json::json!({ "items": tickets }))).into_response()
}

/// GET /tickets/:id - Get a specific ticket
pub async fn get_ticket(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require_role(&services.policy, &principal, &readers()) {
        return resp;
    }

    let ticket_id: TicketId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_response(e),
    };

    match services.tickets.get(&ticket_id) {
        Ok(ticket) => (StatusCode::OK, Json(ticket)).into_response(),
        Err(e) => errors::store_error_response(e),
    }
}

/// PATCH /tickets/:id - Update title, body, status and/or assignee
pub async fn patch_ticket(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(patch): Json<TicketPatch>,
) -> axum::response::Response {
    if let Err(resp) = require_role(&services.policy, &principal, &agents()) {
        return resp;
    }

    let ticket_id: TicketId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_response(e),
    };

    let before = match services.tickets.get(&ticket_id) {
        Ok(t) => t,
        Err(e) => return errors::store_error_response(e),
    };

    let updated = match services.tickets.update(&ticket_id, &patch, Utc::now()) {
        Ok(t) => t,
        Err(e) => return errors::store_error_response(e),
    };

    if updated.status != before.status {
        notify_status_change(&services, &updated);
    }

    (StatusCode::OK, Json(updated)).into_response()
}

/// DELETE /tickets/:id - Remove a ticket
pub async fn delete_ticket(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require_role(&services.policy, &principal, &agents()) {
        return resp;
    }

    let ticket_id: TicketId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_response(e),
    };

    match services.tickets.remove(&ticket_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_response(e),
    }
}

/// Tell the opener their ticket moved.
fn notify_status_change(services: &AppServices, ticket: &TicketRecord) {
    services.dispatcher.dispatch(Notification {
        recipient: ticket.opened_by,
        topic: "ticket.updated".to_string(),
        subject: format!("Ticket '{}' is now {}", ticket.title, ticket.status),
        payload: serde_json::json!({
            "ticket_id": ticket.id,
            "status": ticket.status,
        }),
    });
}
