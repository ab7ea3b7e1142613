use thiserror::Error;

/// Delivery failure on a notification channel.
///
/// These never cross the HTTP boundary: the dispatcher logs them at `warn`
/// and moves on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("mail delivery failed: {0}")]
    Mail(String),

    #[error("push delivery failed: {0}")]
    Push(String),
}
