//! Session bookkeeping records.
//!
//! Sessions are created at login and removed at logout or by an admin. They
//! are bookkeeping only: token verification never consults this store, so a
//! removed session's token stays valid until it expires.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use opsdesk_core::{SessionId, UserId};

use crate::StoreError;
use crate::repository::{InMemoryRepository, Repository};

/// A login session as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Typed store for sessions.
#[derive(Clone)]
pub struct SessionStore<S> {
    store: S,
}

pub type InMemorySessionStore = SessionStore<Arc<InMemoryRepository<SessionId, SessionRecord>>>;

impl Default for InMemorySessionStore {
    fn default() -> Self {
        SessionStore::new(Arc::new(InMemoryRepository::new()))
    }
}

impl<S> SessionStore<S>
where
    S: Repository<SessionId, SessionRecord>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a fresh session for `user_id`, valid for `ttl`.
    pub fn create(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<SessionRecord, StoreError> {
        let record = SessionRecord {
            id: SessionId::new(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        };
        self.store.insert(record.id, record.clone())?;
        Ok(record)
    }

    pub fn get(&self, id: &SessionId) -> Result<SessionRecord, StoreError> {
        self.store.get(id).ok_or(StoreError::NotFound)
    }

    /// All sessions, ordered by creation time.
    pub fn list(&self) -> Vec<SessionRecord> {
        let mut sessions = self.store.list();
        sessions.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        sessions
    }

    /// Sessions whose expiry is still in the future.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<SessionRecord> {
        self.list()
            .into_iter()
            .filter(|s| s.expires_at > now)
            .collect()
    }

    pub fn remove(&self, id: &SessionId) -> Result<SessionRecord, StoreError> {
        self.store.remove(id)
    }
}
