//! Driving port for student lookups.

use async_trait::async_trait;

use crate::domain::{Error, StudentId, StudentSnapshot};

/// Domain use-case port for reading student snapshots.
#[async_trait]
pub trait StudentsQuery: Send + Sync {
    /// Fetch one student with its reviews embedded in insertion order.
    async fn get(&self, student_id: StudentId) -> Result<StudentSnapshot, Error>;

    /// All student snapshots in insertion order.
    async fn list(&self) -> Result<Vec<StudentSnapshot>, Error>;
}
