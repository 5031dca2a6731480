//! User records and their storage backends.
//!
//! The backend is chosen at startup: PostgreSQL when a DSN is configured,
//! otherwise an in-process map. Both expose the same lookup/create/update
//! operations through [`UserStore`].

pub mod accounts;
mod memory;
mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

use anyhow::Result;
use std::fmt;
use uuid::Uuid;

#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"***")
            .finish()
    }
}

impl User {
    /// Identity string bound to this user's sessions.
    #[must_use]
    pub fn identity(&self) -> String {
        self.id.to_string()
    }
}

/// Outcome of inserting a new user.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(User),
    Conflict,
}

#[derive(Clone, Debug)]
pub enum UserStore {
    Memory(MemoryUserStore),
    Postgres(PgUserStore),
}

impl UserStore {
    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(MemoryUserStore::new())
    }

    #[must_use]
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Postgres(_) => "postgres",
        }
    }

    /// # Errors
    /// Returns an error if the backend query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        match self {
            Self::Memory(store) => Ok(store.find_by_email(email)),
            Self::Postgres(store) => store.find_by_email(email).await,
        }
    }

    /// # Errors
    /// Returns an error if the backend query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        match self {
            Self::Memory(store) => Ok(store.find_by_id(id)),
            Self::Postgres(store) => store.find_by_id(id).await,
        }
    }

    /// Insert a user; a duplicate email is a `Conflict`, not an error.
    ///
    /// # Errors
    /// Returns an error if the backend insert fails for any other reason.
    pub async fn create(&self, email: &str, password_hash: &str) -> Result<CreateOutcome> {
        match self {
            Self::Memory(store) => Ok(store.create(email, password_hash)),
            Self::Postgres(store) => store.create(email, password_hash).await,
        }
    }

    /// Replace the stored password hash; returns whether the user existed.
    ///
    /// # Errors
    /// Returns an error if the backend update fails.
    pub async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> Result<bool> {
        match self {
            Self::Memory(store) => Ok(store.update_password_hash(id, password_hash)),
            Self::Postgres(store) => store.update_password_hash(id, password_hash).await,
        }
    }

    /// # Errors
    /// Returns an error if the backend is unreachable.
    pub async fn ping(&self) -> Result<()> {
        match self {
            Self::Memory(_) => Ok(()),
            Self::Postgres(store) => store.ping().await,
        }
    }
}
