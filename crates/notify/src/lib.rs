//! `opsdesk-notify` — notification channels and the fan-out dispatcher.
//!
//! Notifications are best-effort: a failed delivery is logged, never returned
//! to the request that caused it.

pub mod channel;
pub mod dispatch;
pub mod error;
pub mod message;

pub use channel::{LogMailer, LogPusher, Mailer, Pusher};
pub use dispatch::Dispatcher;
pub use error::NotifyError;
pub use message::{Notification, RealtimeMessage};
