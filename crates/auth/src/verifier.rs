use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use opsdesk_core::{SessionId, UserId};

use crate::claims::{SessionClaims, validate_claims};
use crate::error::{AuthError, TokenIssueError};
use crate::{Principal, Role};

/// Turns an untrusted bearer credential into a [`Principal`].
///
/// `now` is an explicit argument so callers control the clock: the HTTP
/// middleware passes `Utc::now()`, tests pass fixed instants. Implementations
/// must be pure over `(token, now)`.
pub trait TokenVerifier: Send + Sync {
    fn decode_and_validate(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Principal, AuthError>;
}

/// HS256 verifier/issuer over a single shared signing secret.
///
/// The secret comes from configuration at startup; this type holds the derived
/// keys and is shared read-only behind an `Arc` (no locking, no interior
/// mutability).
pub struct Hs256TokenVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The time window is checked against the caller-provided `now` in
        // `validate_claims`, not against the wall clock (and without leeway).
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign a fresh token for a newly-created session.
    pub fn issue(
        &self,
        user_id: UserId,
        role: Role,
        session_id: SessionId,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenIssueError> {
        let claims = SessionClaims::new(user_id, role, session_id, issued_at, ttl);
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }
}

impl TokenVerifier for Hs256TokenVerifier {
    fn decode_and_validate(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Principal, AuthError> {
        // Signature, malformation and expiry are indistinguishable to callers.
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(|_| AuthError::InvalidToken)?;

        validate_claims(&data.claims, now).map_err(|_| AuthError::InvalidToken)?;

        Ok(Principal::from_claims(&data.claims))
    }
}
