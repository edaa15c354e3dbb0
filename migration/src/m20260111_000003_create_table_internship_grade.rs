use crate::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create GRADE_STATUS enum type
        manager
            .create_type(
                Type::create()
                    .as_enum(GradeStatus::Table)
                    .values([
                        GradeStatus::NotStarted,
                        GradeStatus::InProgress,
                        GradeStatus::DraftCompleted,
                        GradeStatus::Submitted,
                        GradeStatus::Approved,
                        GradeStatus::Rejected,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InternshipGrade::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InternshipGrade::InternshipGradeId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(ColumnDef::new(InternshipGrade::StudentId).uuid().not_null())
                    .col(
                        ColumnDef::new(InternshipGrade::SupervisorId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InternshipGrade::SubjectId).uuid().not_null())
                    .col(
                        ColumnDef::new(InternshipGrade::WorkType)
                            .custom(Alias::new("work_type"))
                            .not_null()
                            .default("internship"),
                    )
                    .col(ColumnDef::new(InternshipGrade::Company).json_binary().null())
                    .col(ColumnDef::new(InternshipGrade::ProjectTopic).text().null())
                    .col(ColumnDef::new(InternshipGrade::StartDate).date().not_null())
                    .col(ColumnDef::new(InternshipGrade::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(InternshipGrade::Milestones)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InternshipGrade::GradeComponents)
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InternshipGrade::FinalGrade).double().null())
                    .col(ColumnDef::new(InternshipGrade::LetterGrade).string().null())
                    .col(
                        ColumnDef::new(InternshipGrade::Status)
                            .enumeration(
                                GradeStatus::Table,
                                [
                                    GradeStatus::NotStarted,
                                    GradeStatus::InProgress,
                                    GradeStatus::DraftCompleted,
                                    GradeStatus::Submitted,
                                    GradeStatus::Approved,
                                    GradeStatus::Rejected,
                                ],
                            )
                            .not_null()
                            .default("not_started"),
                    )
                    .col(
                        ColumnDef::new(InternshipGrade::SubmittedToBcn)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(InternshipGrade::SubmittedAt).timestamp().null())
                    .col(ColumnDef::new(InternshipGrade::ApprovedBy).uuid().null())
                    .col(ColumnDef::new(InternshipGrade::ApprovedAt).timestamp().null())
                    .col(
                        ColumnDef::new(InternshipGrade::SupervisorFinalComment)
                            .text()
                            .null(),
                    )
                    .col(ColumnDef::new(InternshipGrade::BcnComment).text().null())
                    .col(
                        ColumnDef::new(InternshipGrade::Version)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(InternshipGrade::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(
                        ColumnDef::new(InternshipGrade::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_internship_grade_subject")
                            .from_tbl(InternshipGrade::Table)
                            .from_col(InternshipGrade::SubjectId)
                            .to_tbl(Subject::Table)
                            .to_col(Subject::SubjectId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One active record per student and subject; closes the
        // get-or-create race under concurrent first access
        manager
            .create_index(
                Index::create()
                    .name("uq_internship_grade_student_subject")
                    .table(InternshipGrade::Table)
                    .col(InternshipGrade::StudentId)
                    .col(InternshipGrade::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_internship_grade_supervisor")
                    .table(InternshipGrade::Table)
                    .col(InternshipGrade::SupervisorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_internship_grade_subject_status")
                    .table(InternshipGrade::Table)
                    .col(InternshipGrade::SubjectId)
                    .col(InternshipGrade::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_internship_grade_subject_status")
                    .table(InternshipGrade::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_internship_grade_supervisor")
                    .table(InternshipGrade::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("uq_internship_grade_student_subject")
                    .table(InternshipGrade::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(InternshipGrade::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(GradeStatus::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum InternshipGrade {
    Table,
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

#[derive(DeriveIden)]
enum Subject {
    Table,
    SubjectId,
}

#[derive(DeriveIden)]
enum GradeStatus {
    Table,
    NotStarted,
    InProgress,
    DraftCompleted,
    Submitted,
    Approved,
    Rejected,
}
