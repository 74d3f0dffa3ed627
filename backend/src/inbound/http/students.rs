//! Student API handlers.
//!
//! ```text
//! POST /api/v1/students            {"studentId":812394821,"name":"Richard"}
//! GET  /api/v1/students
//! GET  /api/v1/students/{studentId}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Error, StudentId, StudentName, StudentSnapshot, StudentValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Enrolment request body for `POST /api/v1/students`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrolStudentRequest {
    /// External student identifier; nine decimal digits.
    #[schema(example = 812394821)]
    pub student_id: u64,
    /// Display name.
    #[schema(example = "Richard")]
    pub name: String,
}

fn map_student_validation_error(err: StudentValidationError) -> Error {
    let field = match err {
        StudentValidationError::IdOutOfRange { .. } => "studentId",
        StudentValidationError::EmptyName | StudentValidationError::NameTooLong { .. } => "name",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Parse a path-supplied external student identifier.
pub(crate) fn parse_student_id(raw: u64) -> Result<StudentId, Error> {
    StudentId::new(raw).map_err(map_student_validation_error)
}

/// Enrol a student.
///
/// The external identifier is validated before anything is persisted;
/// malformed identifiers never reach the registry.
#[utoipa::path(
    post,
    path = "/api/v1/students",
    request_body = EnrolStudentRequest,
    responses(
        (status = 201, description = "Student enrolled", body = crate::inbound::http::schemas::StudentSchema),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 409, description = "Student already enrolled", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "enrolStudent"
)]
#[post("/students")]
pub async fn enrol_student(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<EnrolStudentRequest>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let EnrolStudentRequest { student_id, name } = payload.into_inner();
    let student_id = parse_student_id(student_id)?;
    let name = StudentName::new(name).map_err(map_student_validation_error)?;

    let snapshot = state.students.enrol(student_id, name).await?;
    Ok(HttpResponse::Created().json(snapshot))
}

/// List students with their reviews and karma.
#[utoipa::path(
    get,
    path = "/api/v1/students",
    responses(
        (status = 200, description = "Students", body = [crate::inbound::http::schemas::StudentSchema]),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "listStudents"
)]
#[get("/students")]
pub async fn list_students(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<StudentSnapshot>>> {
    session.require_user_id()?;
    Ok(web::Json(state.students_query.list().await?))
}

/// Fetch one student by external identifier.
#[utoipa::path(
    get,
    path = "/api/v1/students/{studentId}",
    params(
        ("studentId" = u64, Path, description = "External student identifier")
    ),
    responses(
        (status = 200, description = "Student", body = crate::inbound::http::schemas::StudentSchema),
        (status = 400, description = "Malformed identifier", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such student", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "getStudent"
)]
#[get("/students/{studentId}")]
pub async fn get_student(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<u64>,
) -> ApiResult<web::Json<StudentSnapshot>> {
    session.require_user_id()?;
    let student_id = parse_student_id(path.into_inner())?;
    Ok(web::Json(state.students_query.get(student_id).await?))
}
