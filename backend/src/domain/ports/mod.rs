//! Domain ports: driving use-case traits and driven persistence traits.
//!
//! Driving ports are called by inbound adapters (HTTP handlers); driven
//! ports are implemented by outbound adapters (persistence). Services in
//! the domain implement the driving ports on top of the driven ones.

pub(crate) mod macros;

mod login_service;
mod review_repository;
mod reviews_command;
mod student_repository;
mod students_command;
mod students_query;
mod user_repository;
mod users_command;
mod users_query;

pub use login_service::LoginService;
pub use review_repository::{ReviewPersistenceError, ReviewRepository};
pub use reviews_command::{CreateReviewRequest, ReviewsCommand};
pub use student_repository::{StudentPersistenceError, StudentRepository};
pub use students_command::StudentsCommand;
pub use students_query::StudentsQuery;
pub use user_repository::{UserPersistenceError, UserRepository};
pub use users_command::UsersCommand;
pub use users_query::UsersQuery;

#[cfg(test)]
pub use review_repository::MockReviewRepository;
#[cfg(test)]
pub use student_repository::MockStudentRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
