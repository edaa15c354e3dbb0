use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use super::dto::{PendingGradesResponse, ReviewRequest, SubjectQueryParams, SubjectStatsResponse};
use crate::extractor::AuthClaims;
use crate::routes::grades::dto::GradeResponse;
use crate::workflow::GradeWorkflow;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/reviews/pending", get(list_pending_grades))
        .route("/api/v1/reviews/stats", get(get_subject_stats))
        .route("/api/v1/reviews/{grade_id}", post(review_grade))
}

/// Submitted grades of a subject managed by the caller.
#[utoipa::path(
    get,
    path = "/api/v1/reviews/pending",
    params(("subject_id" = Uuid, Query, description = "Subject id")),
    responses(
        (status = 200, description = "Grades awaiting review", body = PendingGradesResponse),
        (status = 403, description = "Subject managed by another committee member"),
        (status = 404, description = "Subject not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn list_pending_grades(
    AuthClaims(claims): AuthClaims,
    Query(params): Query<SubjectQueryParams>,
) -> Result<(StatusCode, Json<PendingGradesResponse>), (StatusCode, String)> {
    let records = GradeWorkflow::new()
        .list_pending_for_committee(&claims, params.subject_id)
        .await?;

    let grades: Vec<GradeResponse> = records.into_iter().map(GradeResponse::from).collect();
    let total = grades.len() as u64;
    Ok((StatusCode::OK, Json(PendingGradesResponse { grades, total })))
}

/// Committee decision on a submitted grade.
#[utoipa::path(
    post,
    path = "/api/v1/reviews/{grade_id}",
    params(("grade_id" = Uuid, Path, description = "Grade record id")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review recorded", body = GradeResponse),
        (status = 400, description = "Missing review comment"),
        (status = 403, description = "Subject managed by another committee member"),
        (status = 409, description = "Record is not in submitted status"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn review_grade(
    AuthClaims(claims): AuthClaims,
    Path(grade_id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<GradeResponse>), (StatusCode, String)> {
    let record = GradeWorkflow::new()
        .review_grade(&claims, grade_id, payload.decision, payload.comment)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/stats",
    params(("subject_id" = Uuid, Query, description = "Subject id")),
    responses(
        (status = 200, description = "Grading statistics for a subject", body = SubjectStatsResponse),
        (status = 403, description = "Subject managed by another committee member"),
        (status = 404, description = "Subject not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn get_subject_stats(
    AuthClaims(claims): AuthClaims,
    Query(params): Query<SubjectQueryParams>,
) -> Result<(StatusCode, Json<SubjectStatsResponse>), (StatusCode, String)> {
    let stats = GradeWorkflow::new()
        .subject_stats(&claims, params.subject_id)
        .await?;
    Ok((StatusCode::OK, Json(stats.into())))
}
