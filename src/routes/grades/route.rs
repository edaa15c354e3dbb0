use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{delete, get, patch, post, put},
};
use uuid::Uuid;

use super::dto::{
    AddMilestoneRequest, AttachFilesRequest, EditMilestoneRequest, GradeListResponse,
    GradeQueryParams, GradeResponse, StudentProgressResponse, SubmitGradeRequest,
    UpdateComponentsRequest, UpdateMilestoneStatusRequest,
};
use crate::extractor::AuthClaims;
use crate::grading::record::EngagementUpdate;
use crate::workflow::GradeWorkflow;

pub fn create_route() -> Router {
    Router::new()
        .route(
            "/api/v1/grades/students/{student_id}",
            get(get_or_create_for_student),
        )
        .route("/api/v1/grades/mine", get(list_my_grades))
        .route("/api/v1/grades/my-progress", get(get_my_progress))
        .route("/api/v1/grades/{grade_id}", patch(update_engagement))
        .route("/api/v1/grades/{grade_id}/milestones", post(add_milestone))
        .route(
            "/api/v1/grades/{grade_id}/milestones/{milestone_id}",
            put(update_milestone_status)
                .patch(edit_milestone)
                .delete(delete_milestone),
        )
        .route(
            "/api/v1/grades/{grade_id}/milestones/{milestone_id}/documents",
            post(attach_milestone_files),
        )
        .route(
            "/api/v1/grades/{grade_id}/milestones/{milestone_id}/documents/{file_id}",
            delete(remove_milestone_file),
        )
        .route(
            "/api/v1/grades/{grade_id}/components",
            put(update_grade_components),
        )
        .route("/api/v1/grades/{grade_id}/submit", post(submit_grade))
}

/// Opens (and lazily creates) the grade record of an assigned student.
#[utoipa::path(
    get,
    path = "/api/v1/grades/students/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student user id")),
    responses(
        (status = 200, description = "Grade record", body = GradeResponse),
        (status = 403, description = "Student not assigned to caller"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
pub async fn get_or_create_for_student(
    AuthClaims(claims): AuthClaims,
    Path(student_id): Path<Uuid>,
) -> Result<(StatusCode, Json<GradeResponse>), (StatusCode, String)> {
    let record = GradeWorkflow::new()
        .get_or_create_for_student(&claims, student_id)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/grades/mine",
    params(("status" = Option<String>, Query, description = "Filter by record status")),
    responses(
        (status = 200, description = "Grade records supervised by the caller", body = GradeListResponse),
        (status = 403, description = "Forbidden - Faculty only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
pub async fn list_my_grades(
    AuthClaims(claims): AuthClaims,
    Query(params): Query<GradeQueryParams>,
) -> Result<(StatusCode, Json<GradeListResponse>), (StatusCode, String)> {
    let records = GradeWorkflow::new()
        .list_for_supervisor(&claims, params.status)
        .await?;

    let grades: Vec<GradeResponse> = records.into_iter().map(GradeResponse::from).collect();
    let total = grades.len() as u64;
    Ok((StatusCode::OK, Json(GradeListResponse { grades, total })))
}

/// Student view of their own record; the grade shows once approved.
#[utoipa::path(
    get,
    path = "/api/v1/grades/my-progress",
    responses(
        (status = 200, description = "Progress of the caller's record", body = StudentProgressResponse),
        (status = 404, description = "No record yet"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
pub async fn get_my_progress(
    AuthClaims(claims): AuthClaims,
) -> Result<(StatusCode, Json<StudentProgressResponse>), (StatusCode, String)> {
    let record = GradeWorkflow::new().get_my_progress(&claims).await?;
    Ok((StatusCode::OK, Json(record.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/grades/{grade_id}",
    params(("grade_id" = Uuid, Path, description = "Grade record id")),
    request_body = EngagementUpdate,
    responses(
        (status = 200, description = "Engagement details updated", body = GradeResponse),
        (status = 400, description = "Field does not match the work type"),
        (status = 409, description = "Record is read-only in the approval stage"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
pub async fn update_engagement(
    AuthClaims(claims): AuthClaims,
    Path(grade_id): Path<Uuid>,
    Json(payload): Json<EngagementUpdate>,
) -> Result<(StatusCode, Json<GradeResponse>), (StatusCode, String)> {
    let record = GradeWorkflow::new()
        .update_engagement_details(&claims, grade_id, payload)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/grades/{grade_id}/milestones",
    params(("grade_id" = Uuid, Path, description = "Grade record id")),
    request_body = AddMilestoneRequest,
    responses(
        (status = 201, description = "Milestone added", body = GradeResponse),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Milestones"
)]
pub async fn add_milestone(
    AuthClaims(claims): AuthClaims,
    Path(grade_id): Path<Uuid>,
    Json(payload): Json<AddMilestoneRequest>,
) -> Result<(StatusCode, Json<GradeResponse>), (StatusCode, String)> {
    let record = GradeWorkflow::new()
        .add_custom_milestone(
            &claims,
            grade_id,
            payload.title,
            payload.description,
            payload.due_date,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Changes a milestone's status; completing the start milestone moves a
/// fresh record into in_progress.
#[utoipa::path(
    put,
    path = "/api/v1/grades/{grade_id}/milestones/{milestone_id}",
    params(
        ("grade_id" = Uuid, Path, description = "Grade record id"),
        ("milestone_id" = Uuid, Path, description = "Milestone id")
    ),
    request_body = UpdateMilestoneStatusRequest,
    responses(
        (status = 200, description = "Milestone updated", body = GradeResponse),
        (status = 404, description = "Milestone not found"),
        (status = 409, description = "Record is read-only in the approval stage"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Milestones"
)]
pub async fn update_milestone_status(
    AuthClaims(claims): AuthClaims,
    Path((grade_id, milestone_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateMilestoneStatusRequest>,
) -> Result<(StatusCode, Json<GradeResponse>), (StatusCode, String)> {
    let record = GradeWorkflow::new()
        .update_milestone_status(
            &claims,
            grade_id,
            milestone_id,
            payload.status,
            payload.notes,
            payload.documents.unwrap_or_default(),
        )
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/grades/{grade_id}/milestones/{milestone_id}",
    params(
        ("grade_id" = Uuid, Path, description = "Grade record id"),
        ("milestone_id" = Uuid, Path, description = "Milestone id")
    ),
    request_body = EditMilestoneRequest,
    responses(
        (status = 200, description = "Milestone edited", body = GradeResponse),
        (status = 404, description = "Milestone not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Milestones"
)]
pub async fn edit_milestone(
    AuthClaims(claims): AuthClaims,
    Path((grade_id, milestone_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<EditMilestoneRequest>,
) -> Result<(StatusCode, Json<GradeResponse>), (StatusCode, String)> {
    let record = GradeWorkflow::new()
        .edit_milestone(
            &claims,
            grade_id,
            milestone_id,
            payload.title,
            payload.description,
            payload.due_date,
        )
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/grades/{grade_id}/milestones/{milestone_id}",
    params(
        ("grade_id" = Uuid, Path, description = "Grade record id"),
        ("milestone_id" = Uuid, Path, description = "Milestone id")
    ),
    responses(
        (status = 200, description = "Milestone deleted", body = GradeResponse),
        (status = 400, description = "Milestone is not custom"),
        (status = 404, description = "Milestone not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Milestones"
)]
pub async fn delete_milestone(
    AuthClaims(claims): AuthClaims,
    Path((grade_id, milestone_id)): Path<(Uuid, Uuid)>,
) -> Result<(StatusCode, Json<GradeResponse>), (StatusCode, String)> {
    let record = GradeWorkflow::new()
        .delete_milestone(&claims, grade_id, milestone_id)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

/// Supervisor or student attaches already-uploaded files as evidence.
#[utoipa::path(
    post,
    path = "/api/v1/grades/{grade_id}/milestones/{milestone_id}/documents",
    params(
        ("grade_id" = Uuid, Path, description = "Grade record id"),
        ("milestone_id" = Uuid, Path, description = "Milestone id")
    ),
    request_body = AttachFilesRequest,
    responses(
        (status = 200, description = "Files attached", body = GradeResponse),
        (status = 400, description = "Document cap reached"),
        (status = 404, description = "Milestone not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Milestones"
)]
pub async fn attach_milestone_files(
    AuthClaims(claims): AuthClaims,
    Path((grade_id, milestone_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AttachFilesRequest>,
) -> Result<(StatusCode, Json<GradeResponse>), (StatusCode, String)> {
    let record = GradeWorkflow::new()
        .attach_milestone_files(&claims, grade_id, milestone_id, payload.files)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/grades/{grade_id}/milestones/{milestone_id}/documents/{file_id}",
    params(
        ("grade_id" = Uuid, Path, description = "Grade record id"),
        ("milestone_id" = Uuid, Path, description = "Milestone id"),
        ("file_id" = Uuid, Path, description = "Document id")
    ),
    responses(
        (status = 200, description = "File removed", body = GradeResponse),
        (status = 403, description = "Students can only remove their own uploads"),
        (status = 404, description = "Document not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Milestones"
)]
pub async fn remove_milestone_file(
    AuthClaims(claims): AuthClaims,
    Path((grade_id, milestone_id, file_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<(StatusCode, Json<GradeResponse>), (StatusCode, String)> {
    let record = GradeWorkflow::new()
        .remove_milestone_file(&claims, grade_id, milestone_id, file_id)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

/// Writes component scores; the final grade recomputes synchronously and a
/// fully scored record advances to draft_completed.
#[utoipa::path(
    put,
    path = "/api/v1/grades/{grade_id}/components",
    params(("grade_id" = Uuid, Path, description = "Grade record id")),
    request_body = UpdateComponentsRequest,
    responses(
        (status = 200, description = "Components updated", body = GradeResponse),
        (status = 400, description = "Score or weight out of range"),
        (status = 409, description = "Record is read-only in the approval stage"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
pub async fn update_grade_components(
    AuthClaims(claims): AuthClaims,
    Path(grade_id): Path<Uuid>,
    Json(payload): Json<UpdateComponentsRequest>,
) -> Result<(StatusCode, Json<GradeResponse>), (StatusCode, String)> {
    let record = GradeWorkflow::new()
        .update_grade_components(&claims, grade_id, payload.components)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}

/// Hands a completed draft to the committee.
#[utoipa::path(
    post,
    path = "/api/v1/grades/{grade_id}/submit",
    params(("grade_id" = Uuid, Path, description = "Grade record id")),
    request_body = SubmitGradeRequest,
    responses(
        (status = 200, description = "Grade submitted", body = GradeResponse),
        (status = 400, description = "Missing score or final comment"),
        (status = 409, description = "Record is not in draft_completed"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
pub async fn submit_grade(
    AuthClaims(claims): AuthClaims,
    Path(grade_id): Path<Uuid>,
    Json(payload): Json<SubmitGradeRequest>,
) -> Result<(StatusCode, Json<GradeResponse>), (StatusCode, String)> {
    let record = GradeWorkflow::new()
        .submit_grade(&claims, grade_id, payload.final_comment)
        .await?;
    Ok((StatusCode::OK, Json(record.into())))
}
