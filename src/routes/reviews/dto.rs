use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::grading::pipeline::ReviewDecision;
use crate::routes::grades::dto::GradeResponse;
use crate::workflow::SubjectGradeStats;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
    pub comment: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PendingGradesResponse {
    pub grades: Vec<GradeResponse>,
    pub total: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubjectQueryParams {
    pub subject_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubjectStatsResponse {
    pub total: u64,
    pub submitted: u64,
    pub graded: u64,
    pub passed: u64,
    pub failed: u64,
    pub average_final_grade: Option<f64>,
}

impl From<SubjectGradeStats> for SubjectStatsResponse {
    fn from(stats: SubjectGradeStats) -> Self {
        SubjectStatsResponse {
            total: stats.total,
            submitted: stats.submitted,
            graded: stats.graded,
            passed: stats.passed,
            failed: stats.failed,
            average_final_grade: stats.average_final_grade,
        }
    }
}
