//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    LoginService, ReviewsCommand, StudentsCommand, StudentsQuery, UsersCommand, UsersQuery,
};

/// Dependency bundle of port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Authentication use-case.
    pub login: Arc<dyn LoginService>,
    /// User mutations.
    pub users: Arc<dyn UsersCommand>,
    /// User lookups.
    pub users_query: Arc<dyn UsersQuery>,
    /// Student enrolment.
    pub students: Arc<dyn StudentsCommand>,
    /// Student lookups.
    pub students_query: Arc<dyn StudentsQuery>,
    /// Review mutations and karma recomputation.
    pub reviews: Arc<dyn ReviewsCommand>,
}

impl HttpState {
    /// Wire the default in-memory stack: one identity service, one student
    /// registry, and one review service sharing the same repositories.
    pub fn in_memory() -> Self {
        use crate::domain::{ReviewService, StudentService, UserService};
        use crate::outbound::persistence::{
            InMemoryReviewRepository, InMemoryStudentRepository, InMemoryUserRepository,
        };

        let users = Arc::new(InMemoryUserRepository::default());
        let students = Arc::new(InMemoryStudentRepository::default());
        let reviews = Arc::new(InMemoryReviewRepository::default());

        let identity = Arc::new(UserService::new(users));
        let registry = Arc::new(StudentService::new(students.clone(), reviews.clone()));
        let ledger = Arc::new(ReviewService::new(reviews, students));

        Self {
            login: identity.clone(),
            users: identity.clone(),
            users_query: identity,
            students: registry.clone(),
            students_query: registry,
            reviews: ledger,
        }
    }
}
