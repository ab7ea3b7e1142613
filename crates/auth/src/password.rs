use thiserror::Error;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(#[from] bcrypt::BcryptError);

/// Hash a plaintext password for storage.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    // Cost 4 in debug builds keeps test suites fast; release builds use the
    // bcrypt default (12).
    let cost = if cfg!(debug_assertions) {
        4
    } else {
        bcrypt::DEFAULT_COST
    };
    Ok(bcrypt::hash(plain, cost)?)
}

/// Check a plaintext password against a stored hash.
///
/// A malformed stored hash counts as a non-match rather than an error; login
/// treats both the same way.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}
