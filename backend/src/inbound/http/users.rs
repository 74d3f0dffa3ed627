//! User API handlers.
//!
//! ```text
//! POST  /api/v1/login       {"username":"bob","password":"bobpass"}
//! POST  /api/v1/users       {"username":"bob","password":"bobpass"}
//! GET   /api/v1/users
//! PATCH /api/v1/users/{id}  {"username":"ronnie"}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    CredentialValidationError, Error, LoginCredentials, Password, UserId, UserSnapshot,
    UserValidationError, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plaintext password, verified against the stored verifier.
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = CredentialValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Registration request body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    /// Desired login name; must be unique.
    pub username: String,
    /// Plaintext password, hashed into a verifier before storage.
    pub password: String,
}

/// Rename request body for `PATCH /api/v1/users/{id}`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenameUserRequest {
    /// Replacement login name; must be unique.
    pub username: String,
}

fn map_credential_validation_error(err: CredentialValidationError) -> Error {
    match err {
        CredentialValidationError::EmptyUsername => {
            Error::invalid_request("username must not be empty")
                .with_details(json!({ "field": "username", "code": "empty_username" }))
        }
        CredentialValidationError::EmptyPassword => {
            Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password", "code": "empty_password" }))
        }
    }
}

fn map_user_validation_error(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "username" }))
}

/// Authenticate a user and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Invalid credentials", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_credential_validation_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User created", body = crate::inbound::http::schemas::UserSchema),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Username already taken", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterUserRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterUserRequest { username, password } = payload.into_inner();
    let username = Username::new(username).map_err(map_user_validation_error)?;
    let password = Password::new(password).map_err(map_credential_validation_error)?;

    let snapshot = state.users.register(username, &password).await?;
    Ok(HttpResponse::Created().json(snapshot))
}

/// List known users.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [crate::inbound::http::schemas::UserSchema]),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 500, description = "Internal server error", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<UserSnapshot>>> {
    session.require_user_id()?;
    Ok(web::Json(state.users_query.list().await?))
}

/// Change a user's username.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    request_body = RenameUserRequest,
    params(
        ("id" = Uuid, Path, description = "User record identifier")
    ),
    responses(
        (status = 200, description = "User renamed", body = crate::inbound::http::schemas::UserSchema),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such user", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Username already taken", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "renameUser"
)]
#[patch("/users/{id}")]
pub async fn rename_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<RenameUserRequest>,
) -> ApiResult<web::Json<UserSnapshot>> {
    session.require_user_id()?;
    let id = UserId::from_uuid(path.into_inner());
    let username =
        Username::new(payload.into_inner().username).map_err(map_user_validation_error)?;

    let snapshot = state.users.rename(&id, username).await?;
    Ok(web::Json(snapshot))
}
