//! API-side authorization guard for handlers.
//!
//! This enforces role checks at the route boundary (after token
//! verification), while keeping stores and services auth-agnostic.

use axum::response::Response;

use opsdesk_auth::{AccessPolicy, Principal, Role};

use crate::app::errors;

/// Check that the caller's role is allowed for the current route.
///
/// Intended to be called at the **top** of a handler, before any store or
/// service access. A denial is already rendered as the HTTP response.
pub fn require_role(
    policy: &AccessPolicy,
    principal: &Principal,
    allowed: &[Role],
) -> Result<(), Response> {
    policy
        .check(allowed, &principal.role)
        .map_err(|e| errors::auth_error_response(&e))
}
