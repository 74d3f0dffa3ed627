//! Domain primitives, aggregates, ports, and services.
//!
//! Purpose: define strongly typed domain entities and the use-case services
//! around them. Inbound payloads are parsed into these types once at the
//! boundary; invariants and serialisation contracts are documented on each
//! type's Rustdoc. Ports keep the domain free of framework and persistence
//! concerns.

pub mod auth;
pub mod error;
pub mod ports;
pub mod review;
pub mod review_service;
pub mod student;
pub mod student_service;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::auth::{
    CredentialValidationError, LoginCredentials, Password, PasswordVerifier,
    PasswordVerifierError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::review::{
    Review, ReviewId, ReviewMessage, ReviewSnapshot, ReviewValidationError, VoteAdjustment,
    VoteTally, VoteTallyDraft, VoteValidationError,
};
pub use self::review_service::ReviewService;
pub use self::student::{
    Student, StudentId, StudentName, StudentSnapshot, StudentValidationError,
};
pub use self::student_service::StudentService;
pub use self::trace_id::TraceId;
pub use self::user::{User, UserId, UserSnapshot, UserValidationError, Username};
pub use self::user_service::UserService;

/// Convenient domain result alias.
pub type ApiResult<T> = Result<T, Error>;
