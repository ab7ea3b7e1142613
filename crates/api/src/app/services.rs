use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use chrono::Utc;
use tokio::sync::broadcast;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use opsdesk_auth::{AccessPolicy, Hs256TokenVerifier, Role, hash_password};
use opsdesk_core::UserId;
use opsdesk_notify::{Dispatcher, LogMailer, LogPusher, RealtimeMessage};
use opsdesk_store::{InMemorySessionStore, InMemoryTicketStore, InMemoryUserStore, NewUser};

use crate::config::AppConfig;

/// Shared application state, handed to every handler via `Extension`.
#[derive(Clone)]
pub struct AppServices {
    pub users: InMemoryUserStore,
    pub tickets: InMemoryTicketStore,
    pub sessions: InMemorySessionStore,
    pub verifier: Arc<Hs256TokenVerifier>,
    pub policy: AccessPolicy,
    pub dispatcher: Dispatcher,
    pub token_ttl: chrono::Duration,
}

/// Wire up stores, token verifier, notification dispatcher and the bootstrap
/// admin account.
pub fn build_services(config: &AppConfig) -> AppServices {
    let users = InMemoryUserStore::default();
    let tickets = InMemoryTicketStore::default();
    let sessions = InMemorySessionStore::default();

    // Realtime channel (SSE): lossy broadcast, recipient-filtered in handlers.
    let (realtime_tx, _realtime_rx) = broadcast::channel::<RealtimeMessage>(256);
    let dispatcher = Dispatcher::new(Arc::new(LogMailer), Arc::new(LogPusher), realtime_tx);

    let verifier = Arc::new(Hs256TokenVerifier::new(config.jwt_secret.as_bytes()));
    let policy = AccessPolicy::new();

    // Seed the bootstrap admin so a fresh process is immediately usable.
    let password_hash =
        hash_password(&config.admin_password).expect("failed to hash bootstrap admin password");
    users
        .create(
            NewUser {
                email: config.admin_email.clone(),
                display_name: "Administrator".to_string(),
                role: Role::new("admin"),
                password_hash,
            },
            Utc::now(),
        )
        .expect("failed to seed bootstrap admin");

    AppServices {
        users,
        tickets,
        sessions,
        verifier,
        policy,
        dispatcher,
        token_ttl: config.token_ttl,
    }
}

/// Build an SSE stream for one user (used by `/stream`).
pub fn user_sse_stream(
    services: Arc<AppServices>,
    user_id: UserId,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.dispatcher.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |msg| match msg {
        Ok(m) if m.recipient == user_id => {
            let data = serde_json::to_string(&m.payload).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(m.topic).data(data)))
        }
        _ => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
