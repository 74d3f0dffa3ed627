//! Driving port for user lookups.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserSnapshot};

/// Domain use-case port for reading user snapshots.
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch a single user snapshot by identifier.
    async fn get(&self, id: &UserId) -> Result<UserSnapshot, Error>;

    /// All user snapshots in insertion order.
    async fn list(&self) -> Result<Vec<UserSnapshot>, Error>;
}
