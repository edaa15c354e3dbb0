use crate::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create WORK_TYPE enum type
        manager
            .create_type(
                Type::create()
                    .as_enum(WorkType::Table)
                    .values([WorkType::Internship, WorkType::Thesis])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SupervisionAssignment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SupervisionAssignment::AssignmentId)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()".to_string()),
                    )
                    .col(
                        ColumnDef::new(SupervisionAssignment::StudentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupervisionAssignment::SupervisorId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupervisionAssignment::SubjectId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SupervisionAssignment::WorkType)
                            .enumeration(WorkType::Table, [WorkType::Internship, WorkType::Thesis])
                            .not_null()
                            .default("internship"),
                    )
                    .col(
                        ColumnDef::new(SupervisionAssignment::AssignedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_supervision_assignment_subject")
                            .from_tbl(SupervisionAssignment::Table)
                            .from_col(SupervisionAssignment::SubjectId)
                            .to_tbl(Subject::Table)
                            .to_col(Subject::SubjectId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_supervision_assignment_supervisor")
                    .table(SupervisionAssignment::Table)
                    .col(SupervisionAssignment::SupervisorId)
                    .to_owned(),
            )
            .await?;

        // One assignment per student and subject
        manager
            .create_index(
                Index::create()
                    .name("uq_supervision_assignment_student_subject")
                    .table(SupervisionAssignment::Table)
                    .col(SupervisionAssignment::StudentId)
                    .col(SupervisionAssignment::SubjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uq_supervision_assignment_student_subject")
                    .table(SupervisionAssignment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_supervision_assignment_supervisor")
                    .table(SupervisionAssignment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .table(SupervisionAssignment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_type(Type::drop().name(WorkType::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum SupervisionAssignment {
    Table,
    AssignmentId,
    StudentId,
    SupervisorId,
    SubjectId,
    WorkType,
    AssignedAt,
}

#[derive(DeriveIden)]
enum Subject {
    Table,
    SubjectId,
}

#[derive(DeriveIden)]
enum WorkType {
    Table,
    Internship,
    Thesis,
}
