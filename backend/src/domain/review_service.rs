//! Review ledger service: review mutations and karma recomputation.
//!
//! Every review mutation and the karma write it triggers run inside one
//! per-student critical section, so a reader can never observe a student
//! whose stored karma disagrees with its reviews. Karma is always
//! recomputed in full from the current review set; see the `karma` crate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    CreateReviewRequest, ReviewPersistenceError, ReviewRepository, ReviewsCommand,
    StudentPersistenceError, StudentRepository,
};
use crate::domain::{
    Error, Review, ReviewId, ReviewSnapshot, Student, StudentId, VoteAdjustment,
};

/// Per-student async locks guarding mutation + recompute sequences.
///
/// The outer mutex only protects the map itself and is never held across an
/// await point; the inner per-student mutex is.
#[derive(Default)]
struct StudentLocks {
    inner: Mutex<HashMap<u32, Arc<tokio::sync::Mutex<()>>>>,
}

impl StudentLocks {
    fn for_student(&self, student_id: StudentId) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        map.entry(student_id.get()).or_default().clone()
    }
}

/// Review service over the review and student repositories.
#[derive(Clone)]
pub struct ReviewService<R, S> {
    reviews: Arc<R>,
    students: Arc<S>,
    locks: Arc<StudentLocks>,
}

impl<R, S> ReviewService<R, S> {
    /// Create a new service with the given repositories.
    pub fn new(reviews: Arc<R>, students: Arc<S>) -> Self {
        Self {
            reviews,
            students,
            locks: Arc::new(StudentLocks::default()),
        }
    }
}

impl<R, S> ReviewService<R, S>
where
    R: ReviewRepository,
    S: StudentRepository,
{
    fn map_review_error(error: ReviewPersistenceError) -> Error {
        match error {
            ReviewPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("review repository unavailable: {message}"))
            }
            ReviewPersistenceError::Query { message } => {
                Error::internal(format!("review repository error: {message}"))
            }
            ReviewPersistenceError::Missing { id } => {
                Error::not_found(format!("no review with id {id}"))
            }
        }
    }

    fn map_student_error(error: StudentPersistenceError) -> Error {
        match error {
            StudentPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("student repository unavailable: {message}"))
            }
            StudentPersistenceError::Query { message } => {
                Error::internal(format!("student repository error: {message}"))
            }
            StudentPersistenceError::DuplicateStudent { student_id } => {
                Error::conflict(format!("student {student_id} is already enrolled"))
            }
            StudentPersistenceError::Missing { student_id } => {
                Error::not_found(format!("no student with id {student_id}"))
            }
        }
    }

    async fn require_student(&self, student_id: StudentId) -> Result<Student, Error> {
        self.students
            .find_by_student_id(student_id)
            .await
            .map_err(Self::map_student_error)?
            .ok_or_else(|| Error::not_found(format!("no student with id {student_id}")))
    }

    async fn find_review(&self, id: &ReviewId) -> Result<Review, Error> {
        self.reviews
            .find_by_id(id)
            .await
            .map_err(Self::map_review_error)?
            .ok_or_else(|| Error::not_found(format!("no review with id {id}")))
    }

    /// Recompute karma from the full review set. Callers must hold the
    /// per-student lock.
    async fn recompute_locked(&self, student_id: StudentId) -> Result<f64, Error> {
        self.require_student(student_id).await?;

        let reviews = self
            .reviews
            .list_for_student(student_id)
            .await
            .map_err(Self::map_review_error)?;
        let karma =
            karma::score_tallies(reviews.iter().map(|review| review.votes().as_counts()));

        self.students
            .update_karma(student_id, karma)
            .await
            .map_err(Self::map_student_error)?;
        Ok(karma)
    }
}

#[async_trait]
impl<R, S> ReviewsCommand for ReviewService<R, S>
where
    R: ReviewRepository,
    S: StudentRepository,
{
    async fn create(&self, request: CreateReviewRequest) -> Result<ReviewSnapshot, Error> {
        let CreateReviewRequest {
            student_id,
            message,
            votes,
        } = request;

        let lock = self.locks.for_student(student_id);
        let _guard = lock.lock().await;

        self.require_student(student_id).await?;

        let review = Review::new(ReviewId::random(), student_id, message, votes);
        self.reviews
            .insert(&review)
            .await
            .map_err(Self::map_review_error)?;

        let karma = self.recompute_locked(student_id).await?;
        info!(review_id = %review.id(), student_id = %student_id, karma, "review created");
        Ok(review.snapshot())
    }

    async fn adjust_votes(
        &self,
        id: &ReviewId,
        adjustment: VoteAdjustment,
    ) -> Result<ReviewSnapshot, Error> {
        // First read only discovers the owning student; the authoritative
        // read happens under that student's lock.
        let student_id = self.find_review(id).await?.student_id();

        let lock = self.locks.for_student(student_id);
        let _guard = lock.lock().await;

        let mut review = self.find_review(id).await?;
        let votes = adjustment
            .apply(review.votes())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        review.set_votes(votes);

        self.reviews
            .update(&review)
            .await
            .map_err(Self::map_review_error)?;

        let karma = self.recompute_locked(student_id).await?;
        info!(review_id = %id, student_id = %student_id, karma, "review votes adjusted");
        Ok(review.snapshot())
    }

    async fn recompute_karma(&self, student_id: StudentId) -> Result<f64, Error> {
        let lock = self.locks.for_student(student_id);
        let _guard = lock.lock().await;
        self.recompute_locked(student_id).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module, run against the in-memory
    //! persistence adapters so karma consistency is observed end to end.
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::StudentsQuery as _;
    use crate::domain::review::{ReviewMessage, VoteTally};
    use crate::domain::student::StudentName;
    use crate::domain::{ErrorCode, StudentService};
    use crate::outbound::persistence::{InMemoryReviewRepository, InMemoryStudentRepository};

    type Service = ReviewService<InMemoryReviewRepository, InMemoryStudentRepository>;

    fn student_id() -> StudentId {
        StudentId::new(812_394_821).expect("valid test id")
    }

    async fn service_with_student() -> (Service, Arc<InMemoryStudentRepository>) {
        let students = Arc::new(InMemoryStudentRepository::default());
        let reviews = Arc::new(InMemoryReviewRepository::default());
        let student = Student::new(
            uuid::Uuid::new_v4(),
            student_id(),
            StudentName::new("Richard").expect("valid test name"),
        );
        students.insert(&student).await.expect("insert succeeds");
        (ReviewService::new(reviews, students.clone()), students)
    }

    fn request(message: &str, upvote: u32, downvote: u32) -> CreateReviewRequest {
        CreateReviewRequest {
            student_id: student_id(),
            message: ReviewMessage::new(message).expect("valid test message"),
            votes: VoteTally::new(upvote, downvote),
        }
    }

    async fn stored_karma(students: &InMemoryStudentRepository) -> f64 {
        students
            .find_by_student_id(student_id())
            .await
            .expect("lookup succeeds")
            .expect("student exists")
            .karma()
    }

    #[rstest]
    #[case(1, 0, 100.0)]
    #[case(0, 0, 0.0)]
    #[case(1, 1, 50.0)]
    #[tokio::test]
    async fn create_review_recomputes_karma(
        #[case] upvote: u32,
        #[case] downvote: u32,
        #[case] expected: f64,
    ) {
        let (service, students) = service_with_student().await;
        let snapshot = service
            .create(request("text", upvote, downvote))
            .await
            .expect("creation succeeds");
        assert_eq!(snapshot.upvote, upvote);
        assert_eq!(snapshot.downvote, downvote);
        assert_eq!(stored_karma(&students).await, expected);
    }

    #[tokio::test]
    async fn create_review_for_missing_student_is_not_found() {
        let students = Arc::new(InMemoryStudentRepository::default());
        let reviews = Arc::new(InMemoryReviewRepository::default());
        let service = ReviewService::new(reviews.clone(), students);

        let error = service
            .create(request("text", 1, 0))
            .await
            .expect_err("missing student must fail");
        assert_eq!(error.code(), ErrorCode::NotFound);
        // The ledger must not keep an orphaned review.
        let orphans = reviews
            .list_for_student(student_id())
            .await
            .expect("list succeeds");
        assert!(orphans.is_empty());
    }

    #[tokio::test]
    async fn recompute_is_idempotent() {
        let (service, students) = service_with_student().await;
        service
            .create(request("text", 3, 1))
            .await
            .expect("creation succeeds");

        let first = service
            .recompute_karma(student_id())
            .await
            .expect("recompute succeeds");
        let second = service
            .recompute_karma(student_id())
            .await
            .expect("recompute succeeds");
        assert_eq!(first, second);
        assert_eq!(stored_karma(&students).await, 75.0);
    }

    #[tokio::test]
    async fn recompute_for_missing_student_is_not_found() {
        let students = Arc::new(InMemoryStudentRepository::default());
        let reviews = Arc::new(InMemoryReviewRepository::default());
        let service = ReviewService::new(reviews, students);

        let error = service
            .recompute_karma(student_id())
            .await
            .expect_err("missing student must fail");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn adjust_votes_applies_deltas_and_recomputes() {
        let (service, students) = service_with_student().await;
        let created = service
            .create(request("text", 1, 0))
            .await
            .expect("creation succeeds");
        assert_eq!(stored_karma(&students).await, 100.0);

        let id = ReviewId::from_uuid(created.id);
        let updated = service
            .adjust_votes(
                &id,
                VoteAdjustment {
                    upvote: 1,
                    downvote: 0,
                },
            )
            .await
            .expect("adjustment succeeds");
        assert_eq!(updated.upvote, 2);
        assert_eq!(updated.downvote, 0);
        // Ratio unchanged: downvotes stayed at zero.
        assert_eq!(stored_karma(&students).await, 100.0);

        let rebalanced = service
            .adjust_votes(
                &id,
                VoteAdjustment {
                    upvote: 0,
                    downvote: 2,
                },
            )
            .await
            .expect("adjustment succeeds");
        assert_eq!(rebalanced.downvote, 2);
        assert_eq!(stored_karma(&students).await, 50.0);
    }

    #[tokio::test]
    async fn adjust_votes_rejects_negative_result_and_leaves_state_untouched() {
        let (service, students) = service_with_student().await;
        let created = service
            .create(request("text", 1, 0))
            .await
            .expect("creation succeeds");
        let id = ReviewId::from_uuid(created.id);

        let error = service
            .adjust_votes(
                &id,
                VoteAdjustment {
                    upvote: -2,
                    downvote: 0,
                },
            )
            .await
            .expect_err("negative result must fail");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);

        // Stored tallies and karma are unchanged.
        let reviews = service
            .reviews
            .list_for_student(student_id())
            .await
            .expect("list succeeds");
        assert_eq!(reviews.first().map(|review| review.votes().upvote()), Some(1));
        assert_eq!(stored_karma(&students).await, 100.0);
    }

    #[tokio::test]
    async fn adjust_votes_on_missing_review_is_not_found() {
        let (service, _students) = service_with_student().await;
        let error = service
            .adjust_votes(&ReviewId::random(), VoteAdjustment::default())
            .await
            .expect_err("missing review must fail");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn karma_aggregates_across_reviews() {
        let (service, students) = service_with_student().await;
        service
            .create(request("first", 3, 1))
            .await
            .expect("creation succeeds");
        service
            .create(request("second", 1, 3))
            .await
            .expect("creation succeeds");
        assert_eq!(stored_karma(&students).await, 50.0);
    }

    #[tokio::test]
    async fn round_trip_shows_review_on_student_snapshot() {
        let (service, students) = service_with_student().await;
        let reviews = service.reviews.clone();
        service
            .create(request("Hello there", 1, 0))
            .await
            .expect("creation succeeds");

        let registry = StudentService::new(students, reviews);
        let snapshot = registry.get(student_id()).await.expect("lookup succeeds");
        assert_eq!(snapshot.karma, 100.0);
        assert_eq!(
            snapshot.reviews.first().map(|review| review.message.as_str()),
            Some("Hello there")
        );
    }
}
