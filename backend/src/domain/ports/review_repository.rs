//! Port abstraction for review ledger adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Review, ReviewId, StudentId};

use super::macros::define_port_error;

define_port_error! {
    /// Persistence errors raised by review repository adapters.
    pub enum ReviewPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// The targeted review record does not exist.
        Missing { id: String } => "no review record with id {id}",
    }
}

/// Driven port for the review ledger.
///
/// Implementations must provide atomic single-record writes with immediate
/// read-after-write visibility and preserve insertion order per student.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Append a new review record.
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError>;

    /// Fetch a review by identifier.
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewPersistenceError>;

    /// Persist mutated fields of an existing record. Fails with `Missing`
    /// when the record does not exist.
    async fn update(&self, review: &Review) -> Result<(), ReviewPersistenceError>;

    /// All reviews owned by a student, in insertion order.
    async fn list_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<Review>, ReviewPersistenceError>;
}
