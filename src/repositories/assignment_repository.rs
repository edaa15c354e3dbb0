use crate::entities::sea_orm_active_enums::WorkTypeEnum;
use crate::entities::supervision_assignment;
use crate::static_service::DATABASE_CONNECTION;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

pub struct AssignmentRepository;

impl AssignmentRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn get_connection(&self) -> &'static DatabaseConnection {
        DATABASE_CONNECTION
            .get()
            .expect("DATABASE_CONNECTION not set")
    }

    pub async fn create(
        &self,
        student_id: Uuid,
        supervisor_id: Uuid,
        subject_id: Uuid,
        work_type: WorkTypeEnum,
    ) -> Result<supervision_assignment::Model> {
        let db = self.get_connection();

        let assignment = supervision_assignment::ActiveModel {
            assignment_id: Set(Uuid::new_v4()),
            student_id: Set(student_id),
            supervisor_id: Set(supervisor_id),
            subject_id: Set(subject_id),
            work_type: Set(work_type),
            assigned_at: Set(Utc::now().naive_utc()),
        };

        let result = assignment.insert(db).await?;
        Ok(result)
    }

    /// The assignment binding a student to a supervisor, if any.
    pub async fn find_by_student_and_supervisor(
        &self,
        student_id: Uuid,
        supervisor_id: Uuid,
    ) -> Result<Option<supervision_assignment::Model>> {
        let db = self.get_connection();
        let assignment = supervision_assignment::Entity::find()
            .filter(supervision_assignment::Column::StudentId.eq(student_id))
            .filter(supervision_assignment::Column::SupervisorId.eq(supervisor_id))
            .order_by_desc(supervision_assignment::Column::AssignedAt)
            .one(db)
            .await?;
        Ok(assignment)
    }

    pub async fn find_by_supervisor(
        &self,
        supervisor_id: Uuid,
    ) -> Result<Vec<supervision_assignment::Model>> {
        let db = self.get_connection();
        let assignments = supervision_assignment::Entity::find()
            .filter(supervision_assignment::Column::SupervisorId.eq(supervisor_id))
            .order_by_desc(supervision_assignment::Column::AssignedAt)
            .all(db)
            .await?;
        Ok(assignments)
    }

    pub async fn find_all(&self) -> Result<Vec<supervision_assignment::Model>> {
        let db = self.get_connection();
        let assignments = supervision_assignment::Entity::find()
            .order_by_desc(supervision_assignment::Column::AssignedAt)
            .all(db)
            .await?;
        Ok(assignments)
    }
}
