//! Driving port for user mutations.

use async_trait::async_trait;

use crate::domain::{Error, Password, UserId, UserSnapshot, Username};

/// Domain use-case port for creating and renaming users.
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Register a new user. The password is hashed into a verifier before
    /// storage; duplicate usernames fail with `Conflict`.
    async fn register(
        &self,
        username: Username,
        password: &Password,
    ) -> Result<UserSnapshot, Error>;

    /// Change a user's username, leaving credentials untouched.
    async fn rename(&self, id: &UserId, username: Username) -> Result<UserSnapshot, Error>;
}
