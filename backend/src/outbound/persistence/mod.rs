//! Outbound persistence adapters implementing the driven ports.

mod memory;

pub use memory::{InMemoryReviewRepository, InMemoryStudentRepository, InMemoryUserRepository};
