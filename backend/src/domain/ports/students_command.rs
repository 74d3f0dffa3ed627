//! Driving port for student mutations.

use async_trait::async_trait;

use crate::domain::{Error, StudentId, StudentName, StudentSnapshot};

/// Domain use-case port for enrolling students.
#[async_trait]
pub trait StudentsCommand: Send + Sync {
    /// Enrol a student under a validated external identifier. Duplicate
    /// identifiers fail with `Conflict`. New students start with zero karma
    /// and no reviews.
    async fn enrol(
        &self,
        student_id: StudentId,
        name: StudentName,
    ) -> Result<StudentSnapshot, Error>;
}
