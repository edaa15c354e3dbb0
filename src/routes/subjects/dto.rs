use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::subject;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSubjectRequest {
    pub code: String,
    pub name: String,
    pub semester: String,
    /// Committee member responsible for reviewing grades of this subject.
    pub managed_by: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubjectResponse {
    pub subject_id: String,
    pub code: String,
    pub name: String,
    pub semester: String,
    pub managed_by: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<subject::Model> for SubjectResponse {
    fn from(model: subject::Model) -> Self {
        SubjectResponse {
            subject_id: model.subject_id.to_string(),
            code: model.code,
            name: model.name,
            semester: model.semester,
            managed_by: model.managed_by.to_string(),
            created_at: model.created_at.to_string(),
            updated_at: model.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubjectListResponse {
    pub subjects: Vec<SubjectResponse>,
    pub total: u64,
}
