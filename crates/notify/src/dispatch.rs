use std::sync::Arc;

use tokio::sync::broadcast;

use crate::{Mailer, Notification, Pusher, RealtimeMessage};

/// Fans one notification out to mail, push and the realtime stream.
///
/// Fire-and-forget: channel delivery happens on a spawned task, and failures
/// are logged at `warn`. The request that triggered the notification never
/// waits for delivery and never sees a delivery error.
#[derive(Clone)]
pub struct Dispatcher {
    mailer: Arc<dyn Mailer>,
    pusher: Arc<dyn Pusher>,
    realtime_tx: broadcast::Sender<RealtimeMessage>,
}

impl Dispatcher {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        pusher: Arc<dyn Pusher>,
        realtime_tx: broadcast::Sender<RealtimeMessage>,
    ) -> Self {
        Self {
            mailer,
            pusher,
            realtime_tx,
        }
    }

    pub fn dispatch(&self, note: Notification) {
        // Broadcast first (lossy; no backpressure on the request path).
        let _ = self.realtime_tx.send(RealtimeMessage::from(&note));

        let mailer = self.mailer.clone();
        let pusher = self.pusher.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&note).await {
                tracing::warn!(topic = %note.topic, recipient = %note.recipient, "{e}");
            }
            if let Err(e) = pusher.push(&note).await {
                tracing::warn!(topic = %note.topic, recipient = %note.recipient, "{e}");
            }
        });
    }

    /// Subscribe to the realtime stream (used by the SSE route).
    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeMessage> {
        self.realtime_tx.subscribe()
    }
}
