use async_trait::async_trait;

use crate::{Notification, NotifyError};

/// Outbound email channel.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, note: &Notification) -> Result<(), NotifyError>;
}

/// Outbound push channel (mobile/web push, webhook, whatever is wired in).
#[async_trait]
pub trait Pusher: Send + Sync {
    async fn push(&self, note: &Notification) -> Result<(), NotifyError>;
}

/// Dev mailer: logs the delivery instead of sending anything.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, note: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            recipient = %note.recipient,
            topic = %note.topic,
            subject = %note.subject,
            "mail delivered (dev)"
        );
        Ok(())
    }
}

/// Dev pusher: logs the delivery instead of sending anything.
#[derive(Debug, Default)]
pub struct LogPusher;

#[async_trait]
impl Pusher for LogPusher {
    async fn push(&self, note: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            recipient = %note.recipient,
            topic = %note.topic,
            "push delivered (dev)"
        );
        Ok(())
    }
}
