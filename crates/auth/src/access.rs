use crate::{AuthError, Role};

/// Decide whether `actual` may perform an operation open to `allowed` roles.
///
/// - No IO
/// - No panics
/// - No business logic (pure membership test)
///
/// Membership is literal string equality; the admin escape hatch lives in
/// [`AccessPolicy`], never here.
pub fn check_access(allowed: &[Role], actual: &Role) -> Result<(), AuthError> {
    if allowed.iter().any(|r| r == actual) {
        Ok(())
    } else {
        Err(AuthError::forbidden(actual.as_str()))
    }
}

/// The one place where "admin passes everything" is decided.
///
/// Historically this kind of bypass tends to get re-implemented per call site
/// and drift. Here it is a single value constructed once at startup and shared
/// by every route; a deployment that wants literal role matching uses
/// [`AccessPolicy::strict`].
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    admin_override: Option<Role>,
}

impl AccessPolicy {
    /// Default policy: `"admin"` passes every check, listed or not.
    pub fn new() -> Self {
        Self {
            admin_override: Some(Role::new("admin")),
        }
    }

    /// Literal membership only; no role is special.
    pub fn strict() -> Self {
        Self {
            admin_override: None,
        }
    }

    pub fn check(&self, allowed: &[Role], actual: &Role) -> Result<(), AuthError> {
        if let Some(admin) = &self.admin_override {
            if actual == admin {
                return Ok(());
            }
        }
        check_access(allowed, actual)
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new()
    }
}
