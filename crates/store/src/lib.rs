//! `opsdesk-store` — record types and in-memory repositories.
//!
//! Handlers talk to the typed stores (`UserStore`, `TicketStore`,
//! `SessionStore`); the typed stores talk to the [`Repository`] interface.
//! Nothing here persists across restarts.

pub mod error;
pub mod repository;
pub mod sessions;
pub mod tickets;
pub mod users;

pub use error::StoreError;
pub use repository::{InMemoryRepository, Repository};
pub use sessions::{InMemorySessionStore, SessionRecord, SessionStore};
pub use tickets::{
    InMemoryTicketStore, NewTicket, TicketPatch, TicketRecord, TicketStatus, TicketStore,
};
pub use users::{InMemoryUserStore, NewUser, UserPatch, UserRecord, UserStore};
