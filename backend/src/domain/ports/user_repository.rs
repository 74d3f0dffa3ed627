//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds the requested username.
        DuplicateUsername { username: String } => "username already taken: {username}",
        /// The targeted user record does not exist.
        Missing { id: String } => "no user record with id {id}",
    }
}

/// Driven port for the identity store.
///
/// Implementations must provide atomic single-record writes with immediate
/// read-after-write visibility, and must enforce username uniqueness at
/// write time (never silently overwriting an existing record).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record. Fails with `DuplicateUsername` when the
    /// username is already taken.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by username (secondary key).
    async fn find_by_username(&self, username: &str)
    -> Result<Option<User>, UserPersistenceError>;

    /// Persist mutated fields of an existing record. Fails with `Missing`
    /// when the record does not exist and `DuplicateUsername` when a rename
    /// collides.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// All user records in insertion order.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;
}
