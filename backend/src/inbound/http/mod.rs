//! HTTP inbound adapter exposing REST endpoints.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::dev::HttpServiceFactory;
use actix_web::web;

pub mod error;
pub mod health;
pub mod reviews;
pub mod schemas;
pub mod session;
pub mod state;
pub mod students;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

/// Assemble the `/api/v1` scope with every handler and the session
/// middleware wrapped around it. Shared by the server bootstrap and tests.
pub fn api_scope(
    session: SessionMiddleware<CookieSessionStore>,
) -> impl HttpServiceFactory {
    web::scope("/api/v1")
        .wrap(session)
        .service(users::login)
        .service(users::register)
        .service(users::list_users)
        .service(users::rename_user)
        .service(students::enrol_student)
        .service(students::list_students)
        .service(students::get_student)
        .service(reviews::create_review)
        .service(reviews::adjust_review_votes)
}
