use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::WorkTypeEnum;
use crate::entities::supervision_assignment;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateAssignmentRequest {
    pub student_id: Uuid,
    pub supervisor_id: Uuid,
    pub subject_id: Uuid,
    pub work_type: WorkTypeEnum,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssignmentResponse {
    pub assignment_id: String,
    pub student_id: String,
    pub supervisor_id: String,
    pub subject_id: String,
    pub work_type: WorkTypeEnum,
    pub assigned_at: String,
}

impl From<supervision_assignment::Model> for AssignmentResponse {
    fn from(model: supervision_assignment::Model) -> Self {
        AssignmentResponse {
            assignment_id: model.assignment_id.to_string(),
            student_id: model.student_id.to_string(),
            supervisor_id: model.supervisor_id.to_string(),
            subject_id: model.subject_id.to_string(),
            work_type: model.work_type,
            assigned_at: model.assigned_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssignmentListResponse {
    pub assignments: Vec<AssignmentResponse>,
    pub total: u64,
}
