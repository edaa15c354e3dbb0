use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneType {
    Start,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Pending,
    InProgress,
    Completed,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UploaderRole {
    Student,
    Supervisor,
}

/// Opaque reference to a file already stored by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileRef {
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmittedDocument {
    pub file_id: Uuid,
    pub file_name: String,
    pub file_url: String,
    pub file_size: i64,
    pub uploaded_by: UploaderRole,
    pub uploaded_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Milestone {
    pub milestone_id: Uuid,
    pub milestone_type: MilestoneType,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub status: MilestoneStatus,
    pub completed_at: Option<NaiveDateTime>,
    pub is_custom: bool,
    pub notes: Option<String>,
    pub submitted_documents: Vec<SubmittedDocument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GradeComponentType {
    SupervisorScore,
    CompanyScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GradeComponent {
    pub component_type: GradeComponentType,
    pub score: f64,
    pub weight: f64,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct CompanyInfo {
    pub name: String,
    pub contact: Option<String>,
}

/// JSON column wrapper: the milestone list owned by one grade record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Milestones(pub Vec<Milestone>);

/// JSON column wrapper: the grade component list owned by one grade record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct GradeComponents(pub Vec<GradeComponent>);
