//! Support ticket records and the typed store over them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opsdesk_core::{TicketId, UserId};

use crate::StoreError;
use crate::repository::{InMemoryRepository, Repository};

/// Lifecycle state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    #[default]
    Open,
    Pending,
    Closed,
}

impl core::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "open"),
            TicketStatus::Pending => write!(f, "pending"),
            TicketStatus::Closed => write!(f, "closed"),
        }
    }
}

/// A support ticket as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: TicketId,
    pub title: String,
    pub body: String,
    pub status: TicketStatus,
    pub opened_by: UserId,
    pub assignee: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for opening a ticket. The opener comes from the authenticated
/// principal, never from the body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTicket {
    pub title: String,
    pub body: String,
}

/// Partial update for a ticket.
///
/// The write surface of PATCH: opener, id and timestamps are immutable by
/// construction, and unknown body fields are discarded at deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub status: Option<TicketStatus>,
    pub assignee: Option<UserId>,
}

/// Typed store for tickets.
#[derive(Clone)]
pub struct TicketStore<S> {
    store: S,
}

pub type InMemoryTicketStore = TicketStore<Arc<InMemoryRepository<TicketId, TicketRecord>>>;

impl Default for InMemoryTicketStore {
    fn default() -> Self {
        TicketStore::new(Arc::new(InMemoryRepository::new()))
    }
}

impl<S> TicketStore<S>
where
    S: Repository<TicketId, TicketRecord>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Open a new ticket on behalf of `opened_by`.
    pub fn create(
        &self,
        opened_by: UserId,
        new: NewTicket,
        now: DateTime<Utc>,
    ) -> Result<TicketRecord, StoreError> {
        let record = TicketRecord {
            id: TicketId::new(),
            title: new.title.trim().to_string(),
            body: new.body,
            status: TicketStatus::Open,
            opened_by,
            assignee: None,
            created_at: now,
            updated_at: now,
        };
        self.store.insert(record.id, record.clone())?;
        Ok(record)
    }

    pub fn get(&self, id: &TicketId) -> Result<TicketRecord, StoreError> {
        self.store.get(id).ok_or(StoreError::NotFound)
    }

    /// All tickets, ordered by creation time.
    pub fn list(&self) -> Vec<TicketRecord> {
        let mut tickets = self.store.list();
        tickets.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        tickets
    }

    pub fn update(
        &self,
        id: &TicketId,
        patch: &TicketPatch,
        now: DateTime<Utc>,
    ) -> Result<TicketRecord, StoreError> {
        self.store.update(id, &mut |record| {
            if let Some(title) = &patch.title {
                record.title = title.trim().to_string();
            }
            if let Some(body) = &patch.body {
                record.body = body.clone();
            }
            if let Some(status) = patch.status {
                record.status = status;
            }
            if let Some(assignee) = patch.assignee {
                record.assignee = Some(assignee);
            }
            record.updated_at = now;
        })
    }

    pub fn remove(&self, id: &TicketId) -> Result<TicketRecord, StoreError> {
        self.store.remove(id)
    }
}
