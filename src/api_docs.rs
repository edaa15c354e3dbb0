use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::entities::sea_orm_active_enums::{GradeStatusEnum, WorkTypeEnum};
use crate::grading::pipeline::ReviewDecision;
use crate::grading::record::{ComponentScoreUpdate, EngagementUpdate};
use crate::grading::types::{
    CompanyInfo, FileRef, GradeComponent, GradeComponentType, Milestone, MilestoneStatus,
    MilestoneType, SubmittedDocument, UploaderRole,
};
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::route::health_check,
        routes::grades::route::get_or_create_for_student,
        routes::grades::route::list_my_grades,
        routes::grades::route::get_my_progress,
        routes::grades::route::update_engagement,
        routes::grades::route::add_milestone,
        routes::grades::route::update_milestone_status,
        routes::grades::route::edit_milestone,
        routes::grades::route::delete_milestone,
        routes::grades::route::attach_milestone_files,
        routes::grades::route::remove_milestone_file,
        routes::grades::route::update_grade_components,
        routes::grades::route::submit_grade,
        routes::reviews::route::list_pending_grades,
        routes::reviews::route::review_grade,
        routes::reviews::route::get_subject_stats,
        routes::subjects::route::create_subject,
        routes::subjects::route::get_all_subjects,
        routes::assignments::route::create_assignment,
        routes::assignments::route::get_assignments,
    ),
    components(schemas(
        routes::health::route::HealthResponse,
        routes::grades::dto::GradeResponse,
        routes::grades::dto::GradeListResponse,
        routes::grades::dto::StudentProgressResponse,
        routes::grades::dto::UpdateMilestoneStatusRequest,
        routes::grades::dto::AddMilestoneRequest,
        routes::grades::dto::EditMilestoneRequest,
        routes::grades::dto::AttachFilesRequest,
        routes::grades::dto::UpdateComponentsRequest,
        routes::grades::dto::SubmitGradeRequest,
        routes::reviews::dto::ReviewRequest,
        routes::reviews::dto::PendingGradesResponse,
        routes::reviews::dto::SubjectStatsResponse,
        routes::subjects::dto::CreateSubjectRequest,
        routes::subjects::dto::SubjectResponse,
        routes::subjects::dto::SubjectListResponse,
        routes::assignments::dto::CreateAssignmentRequest,
        routes::assignments::dto::AssignmentResponse,
        routes::assignments::dto::AssignmentListResponse,
        ComponentScoreUpdate,
        EngagementUpdate,
        CompanyInfo,
        FileRef,
        SubmittedDocument,
        Milestone,
        MilestoneType,
        MilestoneStatus,
        UploaderRole,
        GradeComponent,
        GradeComponentType,
        GradeStatusEnum,
        WorkTypeEnum,
        ReviewDecision,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Grades", description = "Grade records and components"),
        (name = "Milestones", description = "Milestones and evidence files"),
        (name = "Reviews", description = "Committee approval pipeline"),
        (name = "Subjects", description = "Subject administration"),
        (name = "Assignments", description = "Supervision assignments"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
