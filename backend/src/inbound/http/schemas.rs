//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI
//! documentation using utoipa's external schema registration; the wrappers
//! mirror their corresponding domain types but live in the inbound adapter
//! layer where framework concerns belong.

use utoipa::ToSchema;
use uuid::Uuid;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A required collaborator is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Something went wrong")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::UserSnapshot`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserSnapshot)]
#[expect(
    dead_code,
    reason = "used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Stable user identifier.
    id: Uuid,
    /// Login name.
    #[schema(example = "bob")]
    username: String,
}

/// OpenAPI schema for [`crate::domain::ReviewSnapshot`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ReviewSnapshot)]
#[expect(
    dead_code,
    reason = "used only for OpenAPI schema generation via utoipa"
)]
pub struct ReviewSchema {
    /// Stable review identifier.
    id: Uuid,
    /// Owning student's external identifier.
    #[schema(example = 812394821)]
    student_id: u64,
    /// Free-text body.
    #[schema(example = "Works well in groups")]
    message: String,
    /// Upvote count.
    upvote: u32,
    /// Downvote count.
    downvote: u32,
}

/// OpenAPI schema for [`crate::domain::StudentSnapshot`].
#[derive(ToSchema)]
#[schema(as = crate::domain::StudentSnapshot)]
#[expect(
    dead_code,
    reason = "used only for OpenAPI schema generation via utoipa"
)]
pub struct StudentSchema {
    /// Internal record identifier.
    id: Uuid,
    /// External student identifier.
    #[schema(example = 812394821)]
    student_id: u64,
    /// Display name.
    #[schema(example = "Richard")]
    name: String,
    /// Derived karma score.
    #[schema(example = 100.0)]
    karma: f64,
    /// Owned reviews in insertion order.
    reviews: Vec<ReviewSchema>,
}
