//! Review API handlers.
//!
//! ```text
//! POST  /api/v1/students/{studentId}/reviews
//!       {"message":"text","upvote":1,"downvote":0}
//! PATCH /api/v1/reviews/{id}/votes
//!       {"upvote":1,"downvote":0}   (signed deltas)
//! ```

use actix_web::{HttpResponse, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ports::CreateReviewRequest;
use crate::domain::{
    Error, ReviewId, ReviewMessage, ReviewSnapshot, ReviewValidationError, VoteAdjustment,
    VoteTally, VoteTallyDraft, VoteValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::students::parse_student_id;

/// Review creation body for `POST /api/v1/students/{studentId}/reviews`.
///
/// Vote counts are required; a payload missing either key is rejected with
/// a field-level diagnostic. Zero on both sides is a valid initial state.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewBody {
    /// Free-text review body.
    #[schema(example = "Works well in groups")]
    pub message: String,
    /// Initial upvote count.
    pub upvote: Option<i64>,
    /// Initial downvote count.
    pub downvote: Option<i64>,
}

/// Vote delta body for `PATCH /api/v1/reviews/{id}/votes`.
///
/// Missing fields default to zero; deltas may be negative as long as the
/// resulting tally is not.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdjustVotesBody {
    /// Delta added to the upvote count.
    #[serde(default)]
    pub upvote: i64,
    /// Delta added to the downvote count.
    #[serde(default)]
    pub downvote: i64,
}

fn map_vote_validation_error(err: VoteValidationError) -> Error {
    let field = match err {
        VoteValidationError::MissingUpvote => "upvote",
        VoteValidationError::MissingDownvote => "downvote",
        VoteValidationError::Negative { field, .. }
        | VoteValidationError::TooLarge { field, .. }
        | VoteValidationError::WouldGoNegative { field }
        | VoteValidationError::WouldOverflow { field } => field,
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_review_validation_error(err: ReviewValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "message" }))
}

/// Create a review for a student.
///
/// The owning student must exist; its karma is recomputed before the
/// response is produced.
#[utoipa::path(
    post,
    path = "/api/v1/students/{studentId}/reviews",
    request_body = CreateReviewBody,
    params(
        ("studentId" = u64, Path, description = "External student identifier")
    ),
    responses(
        (status = 201, description = "Review created", body = crate::inbound::http::schemas::ReviewSchema),
        (status = 400, description = "Invalid request", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such student", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/students/{studentId}/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<u64>,
    payload: web::Json<CreateReviewBody>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let student_id = parse_student_id(path.into_inner())?;
    let CreateReviewBody {
        message,
        upvote,
        downvote,
    } = payload.into_inner();

    let votes = VoteTally::try_from(VoteTallyDraft { upvote, downvote })
        .map_err(map_vote_validation_error)?;
    let message = ReviewMessage::new(message).map_err(map_review_validation_error)?;

    let snapshot = state
        .reviews
        .create(CreateReviewRequest {
            student_id,
            message,
            votes,
        })
        .await?;
    Ok(HttpResponse::Created().json(snapshot))
}

/// Apply vote deltas to a review.
///
/// Deltas are added to the stored tallies; an adjustment that would drive a
/// tally below zero is rejected and changes nothing. The owning student's
/// karma is recomputed before the response is produced.
#[utoipa::path(
    patch,
    path = "/api/v1/reviews/{id}/votes",
    request_body = AdjustVotesBody,
    params(
        ("id" = Uuid, Path, description = "Review record identifier")
    ),
    responses(
        (status = 200, description = "Review updated", body = crate::inbound::http::schemas::ReviewSchema),
        (status = 400, description = "Invalid adjustment", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Unauthorised", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "No such review", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "adjustReviewVotes"
)]
#[patch("/reviews/{id}/votes")]
pub async fn adjust_review_votes(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<AdjustVotesBody>,
) -> ApiResult<web::Json<ReviewSnapshot>> {
    session.require_user_id()?;
    let id = ReviewId::from_uuid(path.into_inner());
    let AdjustVotesBody { upvote, downvote } = payload.into_inner();
    let adjustment = VoteAdjustment { upvote, downvote };

    let snapshot = state.reviews.adjust_votes(&id, adjustment).await?;
    Ok(web::Json(snapshot))
}
