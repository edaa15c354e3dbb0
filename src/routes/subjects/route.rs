use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};

use super::dto::{CreateSubjectRequest, SubjectListResponse, SubjectResponse};
use crate::extractor::AuthClaims;
use crate::repositories::SubjectRepository;
use crate::structs::token_claims::UserRole;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/subjects", post(create_subject))
        .route("/api/v1/subjects", get(get_all_subjects))
}

/// Create a new internship subject (training office only)
#[utoipa::path(
    post,
    path = "/api/v1/subjects",
    request_body = CreateSubjectRequest,
    responses(
        (status = 201, description = "Subject created", body = SubjectResponse),
        (status = 400, description = "Bad request"),
        (status = 403, description = "Forbidden - Training office only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn create_subject(
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<SubjectResponse>), (StatusCode, String)> {
    if claims.role != UserRole::TRAINING_OFFICE {
        return Err((
            StatusCode::FORBIDDEN,
            "Only the training office can create subjects".to_string(),
        ));
    }

    if payload.code.trim().is_empty() || payload.name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Subject code and name cannot be empty".to_string(),
        ));
    }

    let subject_repo = SubjectRepository::new();
    let subject = subject_repo
        .create(
            payload.code,
            payload.name,
            payload.semester,
            payload.managed_by,
        )
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create subject: {}", e),
            )
        })?;

    Ok((StatusCode::CREATED, Json(subject.into())))
}

/// Get all subjects (Authenticated users)
#[utoipa::path(
    get,
    path = "/api/v1/subjects",
    responses(
        (status = 200, description = "Subjects retrieved", body = SubjectListResponse),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
pub async fn get_all_subjects(
    AuthClaims(_claims): AuthClaims,
) -> Result<(StatusCode, Json<SubjectListResponse>), (StatusCode, String)> {
    let subject_repo = SubjectRepository::new();
    let subjects = subject_repo.find_all().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to get subjects: {}", e),
        )
    })?;

    let subjects: Vec<SubjectResponse> = subjects.into_iter().map(SubjectResponse::from).collect();
    let total = subjects.len() as u64;
    Ok((StatusCode::OK, Json(SubjectListResponse { subjects, total })))
}
