use crate::entities::internship_grade;
use crate::entities::sea_orm_active_enums::{GradeStatusEnum, WorkTypeEnum};
use crate::grading::record;
use crate::static_service::DATABASE_CONNECTION;
use anyhow::Result;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

/// Default engagement window when a record is synthesized on first access.
const DEFAULT_ENGAGEMENT_WEEKS: i64 = 16;

pub struct GradeRepository;

impl GradeRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn get_connection(&self) -> &'static DatabaseConnection {
        DATABASE_CONNECTION
            .get()
            .expect("DATABASE_CONNECTION not set")
    }

    pub async fn find_by_id(&self, grade_id: Uuid) -> Result<Option<internship_grade::Model>> {
        let db = self.get_connection();
        let record = internship_grade::Entity::find_by_id(grade_id).one(db).await?;
        Ok(record)
    }

    pub async fn find_by_student_and_subject(
        &self,
        student_id: Uuid,
        subject_id: Uuid,
    ) -> Result<Option<internship_grade::Model>> {
        let db = self.get_connection();
        let record = internship_grade::Entity::find()
            .filter(internship_grade::Column::StudentId.eq(student_id))
            .filter(internship_grade::Column::SubjectId.eq(subject_id))
            .one(db)
            .await?;
        Ok(record)
    }

    /// Most recent record for a student across subjects.
    pub async fn find_by_student(&self, student_id: Uuid) -> Result<Option<internship_grade::Model>> {
        let db = self.get_connection();
        let record = internship_grade::Entity::find()
            .filter(internship_grade::Column::StudentId.eq(student_id))
            .order_by_desc(internship_grade::Column::CreatedAt)
            .one(db)
            .await?;
        Ok(record)
    }

    pub async fn find_by_supervisor(
        &self,
        supervisor_id: Uuid,
        status_filter: Option<GradeStatusEnum>,
    ) -> Result<Vec<internship_grade::Model>> {
        let db = self.get_connection();
        let mut query = internship_grade::Entity::find()
            .filter(internship_grade::Column::SupervisorId.eq(supervisor_id));

        if let Some(status) = status_filter {
            query = query.filter(internship_grade::Column::Status.eq(status));
        }

        let records = query
            .order_by_desc(internship_grade::Column::UpdatedAt)
            .all(db)
            .await?;
        Ok(records)
    }

    pub async fn find_by_subject_and_status(
        &self,
        subject_id: Uuid,
        statuses: Vec<GradeStatusEnum>,
    ) -> Result<Vec<internship_grade::Model>> {
        let db = self.get_connection();
        let records = internship_grade::Entity::find()
            .filter(internship_grade::Column::SubjectId.eq(subject_id))
            .filter(internship_grade::Column::Status.is_in(statuses))
            .order_by_desc(internship_grade::Column::SubmittedAt)
            .all(db)
            .await?;
        Ok(records)
    }

    /// Lazy creation on first access. The unique (student_id, subject_id)
    /// index closes the race between two concurrent first reads: the loser's
    /// insert fails and it re-reads the winner's row.
    pub async fn get_or_create(
        &self,
        student_id: Uuid,
        supervisor_id: Uuid,
        subject_id: Uuid,
        work_type: WorkTypeEnum,
    ) -> Result<internship_grade::Model> {
        if let Some(existing) = self
            .find_by_student_and_subject(student_id, subject_id)
            .await?
        {
            return Ok(existing);
        }

        let db = self.get_connection();
        let now = Utc::now().naive_utc();
        let start_date = now.date();
        let end_date = start_date + Duration::weeks(DEFAULT_ENGAGEMENT_WEEKS);

        let model = record::new_model(
            student_id,
            supervisor_id,
            subject_id,
            work_type,
            start_date,
            end_date,
            now,
        );

        match model.into_active_model().reset_all().insert(db).await {
            Ok(inserted) => Ok(inserted),
            Err(insert_err) => {
                // Concurrent first access: someone else inserted the row.
                if let Some(existing) = self
                    .find_by_student_and_subject(student_id, subject_id)
                    .await?
                {
                    Ok(existing)
                } else {
                    Err(insert_err.into())
                }
            }
        }
    }

    /// Version-checked whole-row save. Returns `None` when the row moved
    /// under us (version mismatch) so the caller can re-read and re-apply.
    pub async fn save(
        &self,
        mut model: internship_grade::Model,
    ) -> Result<Option<internship_grade::Model>> {
        let db = self.get_connection();
        let loaded_version = model.version;

        model.version = loaded_version + 1;
        model.updated_at = Utc::now().naive_utc();

        let active = model.clone().into_active_model().reset_all();
        let result = internship_grade::Entity::update_many()
            .set(active)
            .filter(internship_grade::Column::InternshipGradeId.eq(model.internship_grade_id))
            .filter(internship_grade::Column::Version.eq(loaded_version))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        Ok(Some(model))
    }
}
