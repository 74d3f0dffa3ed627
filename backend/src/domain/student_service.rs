//! Student registry service implementing the enrolment and lookup ports.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{
    ReviewPersistenceError, ReviewRepository, StudentPersistenceError, StudentRepository,
    StudentsCommand, StudentsQuery,
};
use crate::domain::{
    Error, Review, ReviewSnapshot, Student, StudentId, StudentName, StudentSnapshot,
};

/// Registry service over the student and review repositories.
///
/// Lookups compose a student with its reviews so the presentation layer
/// receives one snapshot per student, reviews in insertion order.
#[derive(Clone)]
pub struct StudentService<S, R> {
    students: Arc<S>,
    reviews: Arc<R>,
}

impl<S, R> StudentService<S, R> {
    /// Create a new service with the given repositories.
    pub fn new(students: Arc<S>, reviews: Arc<R>) -> Self {
        Self { students, reviews }
    }
}

impl<S, R> StudentService<S, R>
where
    S: StudentRepository,
    R: ReviewRepository,
{
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

    fn map_review_error(error: ReviewPersistenceError) -> Error {
        match error {
            ReviewPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("review repository unavailable: {message}"))
            }
            ReviewPersistenceError::Query { message } => {
                Error::internal(format!("review repository error: {message}"))
            }
            ReviewPersistenceError::Missing { id } => {
                Error::internal(format!("review ledger lost record {id}"))
            }
        }
    }

    async fn reviews_for(&self, student_id: StudentId) -> Result<Vec<ReviewSnapshot>, Error> {
        let reviews = self
            .reviews
            .list_for_student(student_id)
            .await
            .map_err(Self::map_review_error)?;
        Ok(reviews.iter().map(Review::snapshot).collect())
    }
}

#[async_trait]
impl<S, R> StudentsCommand for StudentService<S, R>
where
    S: StudentRepository,
    R: ReviewRepository,
{
    async fn enrol(
        &self,
        student_id: StudentId,
        name: StudentName,
    ) -> Result<StudentSnapshot, Error> {
        let student = Student::new(Uuid::new_v4(), student_id, name);
        self.students
            .insert(&student)
            .await
            .map_err(Self::map_student_error)?;

        info!(student_id = %student.student_id(), name = %student.name(), "student enrolled");
        Ok(student.snapshot(Vec::new()))
    }
}

#[async_trait]
impl<S, R> StudentsQuery for StudentService<S, R>
where
    S: StudentRepository,
    R: ReviewRepository,
{
    async fn get(&self, student_id: StudentId) -> Result<StudentSnapshot, Error> {
        let student = self
            .students
            .find_by_student_id(student_id)
            .await
            .map_err(Self::map_student_error)?
            .ok_or_else(|| Error::not_found(format!("no student with id {student_id}")))?;

        let reviews = self.reviews_for(student_id).await?;
        Ok(student.snapshot(reviews))
    }

    async fn list(&self) -> Result<Vec<StudentSnapshot>, Error> {
        let students = self
            .students
            .list()
            .await
            .map_err(Self::map_student_error)?;

        let mut snapshots = Vec::with_capacity(students.len());
        for student in &students {
            let reviews = self.reviews_for(student.student_id()).await?;
            snapshots.push(student.snapshot(reviews));
        }
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockReviewRepository, MockStudentRepository};
    use crate::domain::review::{Review, ReviewId, ReviewMessage, VoteTally};

    fn student_id() -> StudentId {
        StudentId::new(812_394_821).expect("valid test id")
    }

    fn name(raw: &str) -> StudentName {
        StudentName::new(raw).expect("valid test name")
    }

    fn review(owner: StudentId, message: &str, upvote: u32, downvote: u32) -> Review {
        Review::new(
            ReviewId::random(),
            owner,
            ReviewMessage::new(message).expect("valid test message"),
            VoteTally::new(upvote, downvote),
        )
    }

    #[tokio::test]
    async fn enrol_starts_with_zero_karma_and_no_reviews() {
        let mut students = MockStudentRepository::new();
        students
            .expect_insert()
            .withf(|student: &Student| {
                student.student_id() == StudentId::new(812_394_821).expect("valid")
                    && student.karma() == 0.0
            })
            .times(1)
            .returning(|_| Ok(()));
        let reviews = MockReviewRepository::new();

        let service = StudentService::new(Arc::new(students), Arc::new(reviews));
        let snapshot = service
            .enrol(student_id(), name("Richard"))
            .await
            .expect("enrolment succeeds");
        assert_eq!(snapshot.karma, 0.0);
        assert!(snapshot.reviews.is_empty());
        assert_eq!(snapshot.name, "Richard");
    }

    #[tokio::test]
    async fn enrol_surfaces_duplicate_as_conflict() {
        let mut students = MockStudentRepository::new();
        students.expect_insert().times(1).returning(|_| {
            Err(StudentPersistenceError::duplicate_student(812_394_821_u64))
        });
        let reviews = MockReviewRepository::new();

        let service = StudentService::new(Arc::new(students), Arc::new(reviews));
        let error = service
            .enrol(student_id(), name("Richard"))
            .await
            .expect_err("duplicate enrolment must fail");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn get_embeds_reviews_in_insertion_order() {
        let owner = student_id();
        let mut students = MockStudentRepository::new();
        students
            .expect_find_by_student_id()
            .times(1)
            .returning(move |_| {
                Ok(Some(Student::new(
                    Uuid::new_v4(),
                    StudentId::new(812_394_821).expect("valid"),
                    StudentName::new("Richard").expect("valid"),
                )))
            });
        let mut reviews = MockReviewRepository::new();
        let stored = vec![
            review(owner, "first", 1, 0),
            review(owner, "second", 0, 1),
        ];
        reviews
            .expect_list_for_student()
            .times(1)
            .returning(move |_| Ok(stored.clone()));

        let service = StudentService::new(Arc::new(students), Arc::new(reviews));
        let snapshot = service.get(owner).await.expect("lookup succeeds");
        let messages: Vec<_> = snapshot
            .reviews
            .iter()
            .map(|review| review.message.as_str())
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn get_unknown_student_is_not_found() {
        let mut students = MockStudentRepository::new();
        students
            .expect_find_by_student_id()
            .times(1)
            .returning(|_| Ok(None));
        let mut reviews = MockReviewRepository::new();
        reviews.expect_list_for_student().times(0);

        let service = StudentService::new(Arc::new(students), Arc::new(reviews));
        let error = service
            .get(student_id())
            .await
            .expect_err("missing student must fail");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
