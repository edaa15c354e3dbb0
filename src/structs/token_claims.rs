use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Roles minted by the upstream auth service. This service only consumes them.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum UserRole {
    #[serde(rename = "training-office")]
    TRAINING_OFFICE,
    #[serde(rename = "committee")]
    COMMITTEE,
    #[serde(rename = "faculty")]
    FACULTY,
    #[serde(rename = "student")]
    STUDENT,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: String,
    pub role: UserRole,
    pub exp: i64,
}
