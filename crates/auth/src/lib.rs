//! `opsdesk-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it turns an
//! untrusted token string into a [`Principal`] and decides role membership.
//! It performs no logging, no retries, and no IO.

pub mod access;
pub mod claims;
pub mod error;
pub mod password;
pub mod principal;
pub mod roles;
pub mod verifier;

pub use access::{AccessPolicy, check_access};
pub use claims::{SessionClaims, TokenValidationError, validate_claims};
pub use error::{AuthError, TokenIssueError};
pub use password::{PasswordError, hash_password, verify_password};
pub use principal::Principal;
pub use roles::Role;
pub use verifier::{Hs256TokenVerifier, TokenVerifier};
