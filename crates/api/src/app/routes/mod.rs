use axum::{
    Router,
    routing::{get, post},
};

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod system;
pub mod tickets;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/stream", get(system::stream))
        .route("/auth/logout", post(auth::logout))
        .nest("/tickets", tickets::router())
        .nest("/dashboard", dashboard::router())
        .nest("/admin", admin::router())
}
