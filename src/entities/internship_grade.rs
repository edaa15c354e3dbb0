//! `SeaORM` Entity for internship_grade table
//!
//! One row per (student, subject). Milestones and grade components are
//! embedded JSON collections so every mutation is a single-row write.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{GradeStatusEnum, WorkTypeEnum};
use crate::grading::types::{CompanyInfo, GradeComponents, Milestones};

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "internship_grade"
    }
}

#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Serialize, Deserialize)]
pub struct Model {
    #[serde(skip_deserializing)]
    pub internship_grade_id: Uuid,
    pub student_id: Uuid,
    pub supervisor_id: Uuid,
    pub subject_id: Uuid,
    pub work_type: WorkTypeEnum,
    pub company: Option<CompanyInfo>,
    pub project_topic: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub milestones: Milestones,
    pub grade_components: GradeComponents,
    pub final_grade: Option<f64>,
    pub letter_grade: Option<String>,
    pub status: GradeStatusEnum,
    pub submitted_to_bcn: bool,
    pub submitted_at: Option<DateTime>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime>,
    pub supervisor_final_comment: Option<String>,
    pub bcn_comment: Option<String>,
    pub version: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    InternshipGradeId,
    StudentId,
    SupervisorId,
    SubjectId,
    WorkType,
    Company,
    ProjectTopic,
    StartDate,
    EndDate,
    Milestones,
    GradeComponents,
    FinalGrade,
    LetterGrade,
    Status,
    SubmittedToBcn,
    SubmittedAt,
    ApprovedBy,
    ApprovedAt,
    SupervisorFinalComment,
    BcnComment,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(Copy, Clone, Debug, EnumIter, DerivePrimaryKey)]
pub enum PrimaryKey {
    InternshipGradeId,
}

impl PrimaryKeyTrait for PrimaryKey {
    type ValueType = Uuid;
    fn auto_increment() -> bool {
        false
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Subject,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::InternshipGradeId => ColumnType::Uuid.def(),
            Self::StudentId => ColumnType::Uuid.def(),
            Self::SupervisorId => ColumnType::Uuid.def(),
            Self::SubjectId => ColumnType::Uuid.def(),
            Self::WorkType => WorkTypeEnum::db_type(),
            Self::Company => ColumnType::Json.def().null(),
            Self::ProjectTopic => ColumnType::Text.def().null(),
            Self::StartDate => ColumnType::Date.def(),
            Self::EndDate => ColumnType::Date.def(),
            Self::Milestones => ColumnType::Json.def(),
            Self::GradeComponents => ColumnType::Json.def(),
            Self::FinalGrade => ColumnType::Double.def().null(),
            Self::LetterGrade => ColumnType::String(StringLen::None).def().null(),
            Self::Status => GradeStatusEnum::db_type(),
            Self::SubmittedToBcn => ColumnType::Boolean.def(),
            Self::SubmittedAt => ColumnType::DateTime.def().null(),
            Self::ApprovedBy => ColumnType::Uuid.def().null(),
            Self::ApprovedAt => ColumnType::DateTime.def().null(),
            Self::SupervisorFinalComment => ColumnType::Text.def().null(),
            Self::BcnComment => ColumnType::Text.def().null(),
            Self::Version => ColumnType::Integer.def(),
            Self::CreatedAt => ColumnType::DateTime.def(),
            Self::UpdatedAt => ColumnType::DateTime.def(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Subject => Entity::belongs_to(super::subject::Entity)
                .from(Column::SubjectId)
                .to(super::subject::Column::SubjectId)
                .into(),
        }
    }
}

impl Related<super::subject::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
