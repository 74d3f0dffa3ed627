//! Port abstraction for student registry adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Student, StudentId};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by student repository adapters.
    pub enum StudentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "student repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "student repository query failed: {message}",
        /// A student with the same external identifier already exists.
        DuplicateStudent { student_id: u64 } => "student {student_id} is already enrolled",
        /// The targeted student record does not exist.
        Missing { student_id: u64 } => "no student record with id {student_id}",
    }
}

/// Driven port for the student registry.
///
/// Implementations must provide atomic single-record writes with immediate
/// read-after-write visibility, and must enforce external-identifier
/// uniqueness at write time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Insert a new student record. Fails with `DuplicateStudent` when the
    /// external identifier is already enrolled.
    async fn insert(&self, student: &Student) -> Result<(), StudentPersistenceError>;

    /// Fetch a student by external identifier (secondary key).
    async fn find_by_student_id(
        &self,
        student_id: StudentId,
    ) -> Result<Option<Student>, StudentPersistenceError>;

    /// Persist a recomputed karma value. Fails with `Missing` when the
    /// record does not exist.
    async fn update_karma(
        &self,
        student_id: StudentId,
        karma: f64,
    ) -> Result<(), StudentPersistenceError>;

    /// All student records in insertion order.
    async fn list(&self) -> Result<Vec<Student>, StudentPersistenceError>;
}
