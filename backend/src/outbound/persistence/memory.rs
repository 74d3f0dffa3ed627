//! In-memory repository adapters.
//!
//! These adapters implement the driven persistence ports over `Vec`s behind
//! interior `RwLock`s: every operation is a single atomic critical section
//! with immediate read-after-write visibility, which is the contract the
//! domain assumes of its persistence collaborator. Records are kept in
//! insertion order; uniqueness constraints are enforced under the write
//! lock, never by silent overwrite.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    ReviewPersistenceError, ReviewRepository, StudentPersistenceError, StudentRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{Review, ReviewId, Student, StudentId, User, UserId};

fn read_guard<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_guard<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory identity store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = write_guard(&self.users);
        if users
            .iter()
            .any(|existing| existing.username() == user.username())
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(read_guard(&self.users)
            .iter()
            .find(|user| user.id() == id)
            .cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(read_guard(&self.users)
            .iter()
            .find(|user| user.username().as_ref() == username)
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = write_guard(&self.users);
        if users
            .iter()
            .any(|existing| existing.id() != user.id() && existing.username() == user.username())
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        let Some(slot) = users.iter_mut().find(|existing| existing.id() == user.id()) else {
            return Err(UserPersistenceError::missing(user.id().to_string()));
        };
        *slot = user.clone();
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(read_guard(&self.users).clone())
    }
}

/// In-memory student registry.
#[derive(Default)]
pub struct InMemoryStudentRepository {
    students: RwLock<Vec<Student>>,
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn insert(&self, student: &Student) -> Result<(), StudentPersistenceError> {
        let mut students = write_guard(&self.students);
        if students
            .iter()
            .any(|existing| existing.student_id() == student.student_id())
        {
            return Err(StudentPersistenceError::duplicate_student(u64::from(
                student.student_id(),
            )));
        }
        students.push(student.clone());
        Ok(())
    }

    async fn find_by_student_id(
        &self,
        student_id: StudentId,
    ) -> Result<Option<Student>, StudentPersistenceError> {
        Ok(read_guard(&self.students)
            .iter()
            .find(|student| student.student_id() == student_id)
            .cloned())
    }

    async fn update_karma(
        &self,
        student_id: StudentId,
        karma: f64,
    ) -> Result<(), StudentPersistenceError> {
        let mut students = write_guard(&self.students);
        let Some(student) = students
            .iter_mut()
            .find(|student| student.student_id() == student_id)
        else {
            return Err(StudentPersistenceError::missing(u64::from(student_id)));
        };
        student.set_karma(karma);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Student>, StudentPersistenceError> {
        Ok(read_guard(&self.students).clone())
    }
}

/// In-memory review ledger.
#[derive(Default)]
pub struct InMemoryReviewRepository {
    reviews: RwLock<Vec<Review>>,
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        write_guard(&self.reviews).push(review.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewPersistenceError> {
        Ok(read_guard(&self.reviews)
            .iter()
            .find(|review| review.id() == id)
            .cloned())
    }

    async fn update(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        let mut reviews = write_guard(&self.reviews);
        let Some(slot) = reviews
            .iter_mut()
            .find(|existing| existing.id() == review.id())
        else {
            return Err(ReviewPersistenceError::missing(review.id().to_string()));
        };
        *slot = review.clone();
        Ok(())
    }

    async fn list_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<Review>, ReviewPersistenceError> {
        Ok(read_guard(&self.reviews)
            .iter()
            .filter(|review| review.student_id() == student_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use uuid::Uuid;

    use super::*;
    use crate::domain::auth::{Password, PasswordVerifier};
    use crate::domain::review::{ReviewMessage, VoteTally};
    use crate::domain::student::StudentName;
    use crate::domain::user::Username;

    fn user(name: &str) -> User {
        let verifier = PasswordVerifier::derive(&Password::new("pw").expect("password shape"))
            .expect("derivation succeeds");
        User::new(
            UserId::random(),
            Username::new(name).expect("valid username"),
            verifier,
        )
    }

    fn student(raw_id: u64, name: &str) -> Student {
        Student::new(
            Uuid::new_v4(),
            StudentId::new(raw_id).expect("valid student id"),
            StudentName::new(name).expect("valid student name"),
        )
    }

    fn review(owner: u64, message: &str) -> Review {
        Review::new(
            ReviewId::random(),
            StudentId::new(owner).expect("valid student id"),
            ReviewMessage::new(message).expect("valid message"),
            VoteTally::new(0, 0),
        )
    }

    #[tokio::test]
    async fn duplicate_usernames_are_rejected_not_overwritten() {
        let repo = InMemoryUserRepository::default();
        let first = user("bob");
        repo.insert(&first).await.expect("first insert succeeds");

        let err = repo.insert(&user("bob")).await.expect_err("must fail");
        assert!(matches!(err, UserPersistenceError::DuplicateUsername { .. }));

        // The original record survives unchanged.
        let stored = repo
            .find_by_username("bob")
            .await
            .expect("lookup succeeds")
            .expect("record exists");
        assert_eq!(stored.id(), first.id());
    }

    #[tokio::test]
    async fn rename_collision_is_rejected() {
        let repo = InMemoryUserRepository::default();
        repo.insert(&user("bob")).await.expect("insert succeeds");
        let mut second = user("rick");
        repo.insert(&second).await.expect("insert succeeds");

        second.rename(Username::new("bob").expect("valid username"));
        let err = repo.update(&second).await.expect_err("must fail");
        assert!(matches!(err, UserPersistenceError::DuplicateUsername { .. }));
    }

    #[tokio::test]
    async fn users_list_in_insertion_order() {
        let repo = InMemoryUserRepository::default();
        repo.insert(&user("bob")).await.expect("insert succeeds");
        repo.insert(&user("rick")).await.expect("insert succeeds");

        let names: Vec<_> = repo
            .list()
            .await
            .expect("list succeeds")
            .iter()
            .map(|user| user.username().as_ref().to_owned())
            .collect();
        assert_eq!(names, vec!["bob", "rick"]);
    }

    #[tokio::test]
    async fn duplicate_student_ids_are_rejected() {
        let repo = InMemoryStudentRepository::default();
        repo.insert(&student(812_394_821, "Richard"))
            .await
            .expect("insert succeeds");
        let err = repo
            .insert(&student(812_394_821, "Impostor"))
            .await
            .expect_err("must fail");
        assert!(matches!(
            err,
            StudentPersistenceError::DuplicateStudent { .. }
        ));
    }

    #[tokio::test]
    async fn karma_updates_are_immediately_visible() {
        let repo = InMemoryStudentRepository::default();
        let record = student(812_394_821, "Richard");
        repo.insert(&record).await.expect("insert succeeds");

        repo.update_karma(record.student_id(), 100.0)
            .await
            .expect("update succeeds");
        let stored = repo
            .find_by_student_id(record.student_id())
            .await
            .expect("lookup succeeds")
            .expect("record exists");
        assert_eq!(stored.karma(), 100.0);
    }

    #[tokio::test]
    async fn karma_update_for_unknown_student_is_missing() {
        let repo = InMemoryStudentRepository::default();
        let err = repo
            .update_karma(StudentId::new(812_394_821).expect("valid id"), 1.0)
            .await
            .expect_err("must fail");
        assert!(matches!(err, StudentPersistenceError::Missing { .. }));
    }

    #[tokio::test]
    async fn reviews_keep_per_student_insertion_order() {
        let repo = InMemoryReviewRepository::default();
        repo.insert(&review(812_394_821, "first"))
            .await
            .expect("insert succeeds");
        repo.insert(&review(816_014_286, "other student"))
            .await
            .expect("insert succeeds");
        repo.insert(&review(812_394_821, "second"))
            .await
            .expect("insert succeeds");

        let messages: Vec<_> = repo
            .list_for_student(StudentId::new(812_394_821).expect("valid id"))
            .await
            .expect("list succeeds")
            .iter()
            .map(|review| review.message().as_ref().to_owned())
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn updating_unknown_review_is_missing() {
        let repo = InMemoryReviewRepository::default();
        let err = repo
            .update(&review(812_394_821, "ghost"))
            .await
            .expect_err("must fail");
        assert!(matches!(err, ReviewPersistenceError::Missing { .. }));
    }
}
