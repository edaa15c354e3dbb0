pub use sea_orm_migration::prelude::*;

mod m20260110_000001_create_table_subject;
mod m20260110_000002_create_table_supervision_assignment;
mod m20260111_000003_create_table_internship_grade;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260110_000001_create_table_subject::Migration),
            Box::new(m20260110_000002_create_table_supervision_assignment::Migration),
            Box::new(m20260111_000003_create_table_internship_grade::Migration),
        ]
    }
}
