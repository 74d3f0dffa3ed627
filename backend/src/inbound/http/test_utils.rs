//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{App, test as actix_test, web};
use serde_json::json;

use crate::inbound::http::api_scope;
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Build the full application over fresh in-memory repositories.
pub fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::in_memory()))
        .service(api_scope(test_session_middleware()))
}

/// Service bound shared by the request helpers below.
pub trait TestService:
    actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >
{
}

impl<S> TestService for S where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >
{
}

/// Log in and return the session cookie. The user must already exist.
pub async fn login_cookie(
    app: &impl TestService,
    username: &str,
    password: &str,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "login should succeed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Register a user, log in, and return the session cookie.
pub async fn register_and_login(
    app: &impl TestService,
    username: &str,
    password: &str,
) -> Cookie<'static> {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(
        response.status().is_success(),
        "registration should succeed"
    );
    login_cookie(app, username, password).await
}

/// Enrol a student through the HTTP surface.
pub async fn enrol_student(
    app: &impl TestService,
    cookie: &Cookie<'static>,
    student_id: u64,
    name: &str,
) {
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/students")
        .cookie(cookie.clone())
        .set_json(json!({ "studentId": student_id, "name": name }))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "enrolment should succeed");
}
