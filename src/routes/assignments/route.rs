use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use super::dto::{AssignmentListResponse, AssignmentResponse, CreateAssignmentRequest};
use crate::extractor::AuthClaims;
use crate::repositories::{AssignmentRepository, SubjectRepository};
use crate::structs::token_claims::UserRole;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/assignments", post(create_assignment))
        .route("/api/v1/assignments", get(get_assignments))
}

/// Bind a student to a supervising faculty member for a subject
/// (training office only)
#[utoipa::path(
    post,
    path = "/api/v1/assignments",
    request_body = CreateAssignmentRequest,
    responses(
        (status = 201, description = "Assignment created", body = AssignmentResponse),
        (status = 403, description = "Forbidden - Training office only"),
        (status = 404, description = "Subject not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Assignments"
)]
pub async fn create_assignment(
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<AssignmentResponse>), (StatusCode, String)> {
    if claims.role != UserRole::TRAINING_OFFICE {
        return Err((
            StatusCode::FORBIDDEN,
            "Only the training office can assign students".to_string(),
        ));
    }

    let subject_repo = SubjectRepository::new();
    subject_repo
        .find_by_id(payload.subject_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to look up subject: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Subject not found".to_string()))?;

    let assignment_repo = AssignmentRepository::new();
    let assignment = assignment_repo
        .create(
            payload.student_id,
            payload.supervisor_id,
            payload.subject_id,
            payload.work_type,
        )
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create assignment: {}", e),
            )
        })?;

    Ok((StatusCode::CREATED, Json(assignment.into())))
}

/// List assignments: the training office sees all, faculty see their own
#[utoipa::path(
    get,
    path = "/api/v1/assignments",
    responses(
        (status = 200, description = "Assignments retrieved", body = AssignmentListResponse),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Assignments"
)]
pub async fn get_assignments(
    AuthClaims(claims): AuthClaims,
) -> Result<(StatusCode, Json<AssignmentListResponse>), (StatusCode, String)> {
    let assignment_repo = AssignmentRepository::new();

    let assignments = match claims.role {
        UserRole::TRAINING_OFFICE => assignment_repo.find_all().await,
        UserRole::FACULTY => {
            let supervisor_id = Uuid::parse_str(&claims.user_id).map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Invalid user_id: {}", e),
                )
            })?;
            assignment_repo.find_by_supervisor(supervisor_id).await
        }
        _ => {
            return Err((
                StatusCode::FORBIDDEN,
                "Only the training office and faculty can list assignments".to_string(),
            ));
        }
    }
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to get assignments: {}", e),
        )
    })?;

    let assignments: Vec<AssignmentResponse> = assignments
        .into_iter()
        .map(AssignmentResponse::from)
        .collect();
    let total = assignments.len() as u64;
    Ok((
        StatusCode::OK,
        Json(AssignmentListResponse { assignments, total }),
    ))
}
