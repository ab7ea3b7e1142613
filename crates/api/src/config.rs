//! Process configuration, resolved once at startup.
//!
//! Every knob lives in [`AppConfig`]; handlers and services receive the
//! struct (or values cloned from it) instead of reading the environment
//! themselves.

use tracing::warn;

/// Runtime configuration for the API process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    /// Shared secret for signing and verifying session tokens.
    pub jwt_secret: String,
    /// Lifetime of a freshly issued session token.
    pub token_ttl: chrono::Duration,
    /// Email of the bootstrap administrator seeded at startup.
    pub admin_email: String,
    /// Password of the bootstrap administrator.
    pub admin_password: String,
}

impl AppConfig {
    /// Resolve configuration from the environment, falling back to
    /// development defaults.
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let token_ttl_secs = std::env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(28_800);

        let admin_email = std::env::var("ADMIN_EMAIL")
            .unwrap_or_else(|_| "admin@opsdesk.local".to_string());

        let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
            warn!("ADMIN_PASSWORD not set; using insecure dev default");
            "admin".to_string()
        });

        Self {
            bind_addr,
            jwt_secret,
            token_ttl: chrono::Duration::seconds(token_ttl_secs),
            admin_email,
            admin_password,
        }
    }
}
