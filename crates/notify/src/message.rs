use serde::Serialize;

use opsdesk_core::UserId;

/// A notification addressed to one user.
///
/// `topic` is a dotted event name ("ticket.created", "ticket.updated");
/// `payload` is whatever the emitting handler wants the recipient to see.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub recipient: UserId,
    pub topic: String,
    pub subject: String,
    pub payload: serde_json::Value,
}

/// Realtime message broadcast to SSE subscribers.
///
/// Streams are per-user: the `/stream` handler drops messages whose
/// `recipient` is not the authenticated principal.
#[derive(Debug, Clone, Serialize)]
pub struct RealtimeMessage {
    pub recipient: UserId,
    pub topic: String,
    pub payload: serde_json::Value,
}

impl From<&Notification> for RealtimeMessage {
    fn from(note: &Notification) -> Self {
        Self {
            recipient: note.recipient,
            topic: note.topic.clone(),
            payload: note.payload.clone(),
        }
    }
}
