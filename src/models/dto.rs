// DTO des requêtes / réponses API qui ne correspondent pas directement à une table
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::cohort_member::MemberRole;
use super::users::UserRole;

// ---------------------------------------------------------------------------
// Auth / inscription
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckEmailRequest {
    #[validate(email)]
    pub email: String,
}

/// Type d'inscription trouvé pour un email
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationKind {
    Admin,
    Student,
    Mentor,
}

#[derive(Debug, Serialize)]
pub struct CheckEmailResponse {
    pub exists: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<RegistrationKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SeedAdminRequest {
    #[validate(email)]
    pub email: String,
    pub secret_key: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub id: i32,
}

// ---------------------------------------------------------------------------
// Cohortes / assignations
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    #[validate(length(min = 1))]
    pub user_id: String,
    pub role: MemberRole,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortAssignmentRequest {
    pub mentor_id: i32,
    pub student_id: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAssignmentRequest {
    pub mentor_id: i32,
    pub student_id: i32,
    pub cohort_id: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteRequest {
    pub assignment_ids: Vec<i32>,
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub assignment_id: i32,
    pub scheduled_date: NaiveDate,
    // "HH:MM", vérifié par le service
    pub scheduled_time: String,
    #[validate(range(min = 5, max = 480))]
    pub duration_minutes: Option<i32>,
    #[validate(url)]
    pub meeting_link: Option<String>,
    #[validate(length(max = 10000))]
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_students: usize,
    pub total_mentors: usize,
    pub active_students: usize,
    pub active_mentors: usize,
    pub total_assignments: usize,
    pub total_cohorts: usize,
    pub active_cohorts: usize,
}

