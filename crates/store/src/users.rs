//! User directory records and the typed store over them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opsdesk_auth::Role;
use opsdesk_core::UserId;

use crate::StoreError;
use crate::repository::{InMemoryRepository, Repository};

/// A user account as stored.
///
/// `password_hash` is never serialized, so records can be returned from
/// handlers directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user. The password arrives already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub password_hash: String,
}

/// Partial update for a user.
///
/// These two fields are the whole write surface of PATCH: anything else in
/// the request body (id, email, password_hash, timestamps, or fields that
/// don't exist) is discarded at deserialization and can never reach a record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub display_name: Option<String>,
    pub role: Option<Role>,
}

/// Typed store for user accounts.
#[derive(Clone)]
pub struct UserStore<S> {
    store: S,
}

pub type InMemoryUserStore = UserStore<Arc<InMemoryRepository<UserId, UserRecord>>>;

impl Default for InMemoryUserStore {
    fn default() -> Self {
        UserStore::new(Arc::new(InMemoryRepository::new()))
    }
}

impl<S> UserStore<S>
where
    S: Repository<UserId, UserRecord>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a user. Emails are normalized (trimmed, lowercased) and unique.
    pub fn create(&self, new: NewUser, now: DateTime<Utc>) -> Result<UserRecord, StoreError> {
        let email = new.email.trim().to_lowercase();
        if self.find_by_email(&email).is_some() {
            return Err(StoreError::Conflict(format!(
                "email '{email}' already registered"
            )));
        }

        let record = UserRecord {
            id: UserId::new(),
            email,
            display_name: new.display_name.trim().to_string(),
            role: new.role,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        self.store.insert(record.id, record.clone())?;
        Ok(record)
    }

    pub fn get(&self, id: &UserId) -> Result<UserRecord, StoreError> {
        self.store.get(id).ok_or(StoreError::NotFound)
    }

    /// All users, ordered by creation time.
    pub fn list(&self) -> Vec<UserRecord> {
        let mut users = self.store.list();
        users.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        users
    }

    pub fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
        now: DateTime<Utc>,
    ) -> Result<UserRecord, StoreError> {
        self.store.update(id, &mut |record| {
            if let Some(display_name) = &patch.display_name {
                record.display_name = display_name.trim().to_string();
            }
            if let Some(role) = &patch.role {
                record.role = role.clone();
            }
            record.updated_at = now;
        })
    }

    pub fn remove(&self, id: &UserId) -> Result<UserRecord, StoreError> {
        self.store.remove(id)
    }

    /// Lookup by normalized email (linear scan; fine for an in-memory map).
    pub fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        let normalized = email.trim().to_lowercase();
        self.store.list().into_iter().find(|u| u.email == normalized)
    }
}
