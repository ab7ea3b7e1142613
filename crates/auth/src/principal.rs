use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opsdesk_core::{SessionId, UserId};

use crate::{Role, SessionClaims};

/// The authenticated caller of a request.
///
/// Constructed fresh per request by the verifier after signature and expiry
/// checks pass; never persisted. Handlers read it from request extensions.
/// The only path from untrusted input to a `Principal` is
/// [`crate::TokenVerifier::decode_and_validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
    pub session_id: SessionId,
    pub expires_at: DateTime<Utc>,
}

impl Principal {
    pub fn from_claims(claims: &SessionClaims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role.clone(),
            session_id: claims.sid,
            expires_at: claims.expires_at(),
        }
    }
}
