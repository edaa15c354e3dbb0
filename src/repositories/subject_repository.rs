use crate::entities::subject;
use crate::static_service::DATABASE_CONNECTION;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

pub struct SubjectRepository;

impl SubjectRepository {
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
        code: String,
        name: String,
        semester: String,
        managed_by: Uuid,
    ) -> Result<subject::Model> {
        let db = self.get_connection();
        let now = Utc::now().naive_utc();

        let subject = subject::ActiveModel {
            subject_id: Set(Uuid::new_v4()),
            code: Set(code),
            name: Set(name),
            semester: Set(semester),
            managed_by: Set(managed_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = subject.insert(db).await?;
        Ok(result)
    }

    pub async fn find_by_id(&self, subject_id: Uuid) -> Result<Option<subject::Model>> {
        let db = self.get_connection();
        let subject = subject::Entity::find_by_id(subject_id).one(db).await?;
        Ok(subject)
    }

    pub async fn find_all(&self) -> Result<Vec<subject::Model>> {
        let db = self.get_connection();
        let subjects = subject::Entity::find()
            .order_by_asc(subject::Column::Code)
            .all(db)
            .await?;
        Ok(subjects)
    }

    pub async fn find_managed_by(&self, manager_id: Uuid) -> Result<Vec<subject::Model>> {
        let db = self.get_connection();
        let subjects = subject::Entity::find()
            .filter(subject::Column::ManagedBy.eq(manager_id))
            .order_by_asc(subject::Column::Code)
            .all(db)
            .await?;
        Ok(subjects)
    }
}
