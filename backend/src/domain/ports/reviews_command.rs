//! Driving port for review mutations and karma recomputation.

use async_trait::async_trait;

use crate::domain::{
    Error, ReviewId, ReviewMessage, ReviewSnapshot, StudentId, VoteAdjustment, VoteTally,
};

/// Validated inputs for creating a review.
///
/// The vote payload and message are parsed at the HTTP boundary; by the
/// time a request reaches the service every field is well-formed.
#[derive(Debug, Clone)]
pub struct CreateReviewRequest {
    /// Owning student's external identifier.
    pub student_id: StudentId,
    /// Free-text body.
    pub message: ReviewMessage,
    /// Initial vote tally.
    pub votes: VoteTally,
}

/// Domain use-case port for review mutations.
///
/// Every mutation recomputes the owning student's karma before returning,
/// so no caller ever observes a student whose stored karma disagrees with
/// its reviews.
#[async_trait]
pub trait ReviewsCommand: Send + Sync {
    /// Create a review for an existing student. Fails with `NotFound` when
    /// the student is absent.
    async fn create(&self, request: CreateReviewRequest) -> Result<ReviewSnapshot, Error>;

    /// Apply vote deltas to an existing review. Fails with `NotFound` when
    /// the review is absent and `InvalidRequest` when a delta would drive a
    /// tally out of range, leaving the stored tallies untouched.
    async fn adjust_votes(
        &self,
        id: &ReviewId,
        adjustment: VoteAdjustment,
    ) -> Result<ReviewSnapshot, Error>;

    /// Recompute and persist a student's karma from its current reviews,
    /// returning the stored value. Idempotent.
    async fn recompute_karma(&self, student_id: StudentId) -> Result<f64, Error>;
}
