use thiserror::Error;

/// Rejections produced by the token/access pipeline.
///
/// Exactly three kinds, matching the three ways a protected request can fail
/// before reaching its handler body. Expired, tampered and malformed tokens
/// all collapse into [`AuthError::InvalidToken`]; callers are not told which.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No usable bearer credential was presented (missing header, wrong
    /// scheme, or empty token).
    #[error("token required")]
    TokenRequired,

    /// A credential was presented but failed verification (bad signature,
    /// malformed, or outside its validity window).
    #[error("invalid or expired token")]
    InvalidToken,

    /// The credential is valid but the role is not permitted the operation.
    #[error("insufficient permissions for role '{role}'")]
    Forbidden { role: String },
}

impl AuthError {
    pub fn forbidden(role: impl Into<String>) -> Self {
        Self::Forbidden { role: role.into() }
    }
}

/// Failure to sign a new token at login.
///
/// Kept separate from [`AuthError`] so the request-pipeline contract stays a
/// closed set of three rejections.
#[derive(Debug, Error)]
#[error("failed to sign token: {0}")]
pub struct TokenIssueError(#[from] jsonwebtoken::errors::Error);
