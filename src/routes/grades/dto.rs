use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::internship_grade;
use crate::entities::sea_orm_active_enums::{GradeStatusEnum, WorkTypeEnum};
use crate::grading::record::ComponentScoreUpdate;
use crate::grading::tracker;
use crate::grading::types::{CompanyInfo, FileRef, GradeComponent, Milestone, MilestoneStatus};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GradeResponse {
    pub grade_id: String,
    pub student_id: String,
    pub supervisor_id: String,
    pub subject_id: String,
    pub work_type: WorkTypeEnum,
    pub company: Option<CompanyInfo>,
    pub project_topic: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub milestones: Vec<Milestone>,
    pub grade_components: Vec<GradeComponent>,
    pub final_grade: Option<f64>,
    pub letter_grade: Option<String>,
    pub status: GradeStatusEnum,
    pub progress_percentage: u32,
    pub submitted_to_bcn: bool,
    pub submitted_at: Option<String>,
    pub approved_by: Option<String>,
    pub approved_at: Option<String>,
    pub supervisor_final_comment: Option<String>,
    pub bcn_comment: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<internship_grade::Model> for GradeResponse {
    fn from(model: internship_grade::Model) -> Self {
        let progress_percentage = tracker::progress_percentage(&model.milestones.0);
        GradeResponse {
            grade_id: model.internship_grade_id.to_string(),
            student_id: model.student_id.to_string(),
            supervisor_id: model.supervisor_id.to_string(),
            subject_id: model.subject_id.to_string(),
            work_type: model.work_type,
            company: model.company,
            project_topic: model.project_topic,
            start_date: model.start_date.to_string(),
            end_date: model.end_date.to_string(),
            milestones: model.milestones.0,
            grade_components: model.grade_components.0,
            final_grade: model.final_grade,
            letter_grade: model.letter_grade,
            status: model.status,
            progress_percentage,
            submitted_to_bcn: model.submitted_to_bcn,
            submitted_at: model.submitted_at.map(|d| d.to_string()),
            approved_by: model.approved_by.map(|id| id.to_string()),
            approved_at: model.approved_at.map(|d| d.to_string()),
            supervisor_final_comment: model.supervisor_final_comment,
            bcn_comment: model.bcn_comment,
            created_at: model.created_at.to_string(),
            updated_at: model.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GradeListResponse {
    pub grades: Vec<GradeResponse>,
    pub total: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GradeQueryParams {
    pub status: Option<GradeStatusEnum>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateMilestoneStatusRequest {
    pub status: MilestoneStatus,
    pub notes: Option<String>,
    /// Supervisor evidence recorded together with the status change.
    pub documents: Option<Vec<FileRef>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddMilestoneRequest {
    pub title: String,
    pub description: Option<String>,
    pub due_date: chrono::NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EditMilestoneRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttachFilesRequest {
    pub files: Vec<FileRef>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateComponentsRequest {
    pub components: Vec<ComponentScoreUpdate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitGradeRequest {
    pub final_comment: Option<String>,
}

/// Student-facing view. The numeric grade only shows once the committee
/// approved it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentProgressResponse {
    pub grade_id: String,
    pub subject_id: String,
    pub work_type: WorkTypeEnum,
    pub status: GradeStatusEnum,
    pub progress_percentage: u32,
    pub milestones: Vec<Milestone>,
    pub final_grade: Option<f64>,
    pub letter_grade: Option<String>,
    pub bcn_comment: Option<String>,
}

impl From<internship_grade::Model> for StudentProgressResponse {
    fn from(model: internship_grade::Model) -> Self {
        let progress_percentage = tracker::progress_percentage(&model.milestones.0);
        let approved = model.status == GradeStatusEnum::Approved;
        StudentProgressResponse {
            grade_id: model.internship_grade_id.to_string(),
            subject_id: model.subject_id.to_string(),
            work_type: model.work_type,
            status: model.status,
            progress_percentage,
            milestones: model.milestones.0,
            final_grade: model.final_grade.filter(|_| approved),
            letter_grade: model.letter_grade.filter(|_| approved),
            bcn_comment: model.bcn_comment.filter(|_| approved),
        }
    }
}
