// ============================================================================
// ROUTES : ADMIN
// ============================================================================
//
// Endpoints (tous réservés au rôle admin):
//   - PUT     /api/admin/users/{id}/role
//   - GET     /api/admin/stats
//   - GET/POST/PUT/DELETE /api/admin/students[/{id}] (+ /{id}/status)
//   - GET/POST/PUT/DELETE /api/admin/mentors[/{id}]  (+ /{id}/status)
//   - GET/POST  /api/admin/assignments
//   - DELETE    /api/admin/assignments/{id}
//   - POST      /api/admin/assignments/bulk-delete
//
// ============================================================================

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;

use crate::errors::AppError;
use crate::middleware::{require_role, AuthUser};
use crate::models::dto::{AdminAssignmentRequest, BulkDeleteRequest, StatusRequest, UpdateRoleRequest};
use crate::models::mentor_registration::{MentorRegistrationPatch, NewMentorRegistration};
use crate::models::student_registration::{NewStudentRegistration, StudentRegistrationPatch};
use crate::models::users::UserRole;
use crate::services::{AssignmentService, CohortService, RegistrationService, StatsService};
use crate::storage::{Storage, StorageError};

async fn require_admin(storage: &dyn Storage, auth_user: &AuthUser) -> Result<(), AppError> {
    require_role(storage, auth_user, UserRole::Admin).await.map(|_| ())
}

// ----------------------------------------------------------------------------
// Utilisateurs / statistiques
// ----------------------------------------------------------------------------

#[put("/users/{id}/role")]
pub async fn update_user_role(
    auth_user: AuthUser,
    path: web::Path<String>,
    body: web::Json<UpdateRoleRequest>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    let user_id = path.into_inner();

    let user = storage.update_user_role(&user_id, body.role, None).await?;
    log::info!("Admin {} set role of {} to {}", auth_user.uid, user.id, user.role.as_str());
    Ok(HttpResponse::Ok().json(user))
}

#[get("/stats")]
pub async fn stats(
    auth_user: AuthUser,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    Ok(HttpResponse::Ok().json(StatsService::admin_stats(storage.get_ref()).await?))
}

// ----------------------------------------------------------------------------
// Étudiants
// ----------------------------------------------------------------------------

#[get("/students")]
pub async fn list_students(
    auth_user: AuthUser,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    Ok(HttpResponse::Ok().json(storage.list_student_registrations().await?))
}

#[post("/students")]
pub async fn create_student(
    auth_user: AuthUser,
    body: web::Json<NewStudentRegistration>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    let created = RegistrationService::submit_student(storage.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(created))
}

#[get("/students/{id}")]
pub async fn get_student(
    auth_user: AuthUser,
    path: web::Path<i32>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    let id = path.into_inner();

    let registration = storage
        .get_student_registration(id)
        .await?
        .ok_or_else(|| StorageError::not_found("student registration", id))?;
    Ok(HttpResponse::Ok().json(registration))
}

#[put("/students/{id}")]
pub async fn update_student(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<StudentRegistrationPatch>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    let updated =
        RegistrationService::update_student(storage.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[put("/students/{id}/status")]
pub async fn update_student_status(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<StatusRequest>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    let updated = storage
        .update_student_registration(path.into_inner(), StudentRegistrationPatch::active(body.is_active))
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/students/{id}")]
pub async fn delete_student(
    auth_user: AuthUser,
    path: web::Path<i32>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    RegistrationService::delete_student(storage.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

// ----------------------------------------------------------------------------
// Mentors
// ----------------------------------------------------------------------------

#[get("/mentors")]
pub async fn list_mentors(
    auth_user: AuthUser,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    Ok(HttpResponse::Ok().json(storage.list_mentor_registrations().await?))
}

#[post("/mentors")]
pub async fn create_mentor(
    auth_user: AuthUser,
    body: web::Json<NewMentorRegistration>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    let created = RegistrationService::submit_mentor(storage.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(created))
}

#[get("/mentors/{id}")]
pub async fn get_mentor(
    auth_user: AuthUser,
    path: web::Path<i32>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    let id = path.into_inner();

    let registration = storage
        .get_mentor_registration(id)
        .await?
        .ok_or_else(|| StorageError::not_found("mentor registration", id))?;
    Ok(HttpResponse::Ok().json(registration))
}

#[put("/mentors/{id}")]
pub async fn update_mentor(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<MentorRegistrationPatch>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    let updated =
        RegistrationService::update_mentor(storage.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[put("/mentors/{id}/status")]
pub async fn update_mentor_status(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<StatusRequest>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    let updated = storage
        .update_mentor_registration(path.into_inner(), MentorRegistrationPatch::active(body.is_active))
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

#[delete("/mentors/{id}")]
pub async fn delete_mentor(
    auth_user: AuthUser,
    path: web::Path<i32>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    RegistrationService::delete_mentor(storage.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

// ----------------------------------------------------------------------------
// Assignations
// ----------------------------------------------------------------------------

#[get("/assignments")]
pub async fn list_assignments(
    auth_user: AuthUser,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;

    let assignments = storage.list_assignments().await?;
    let summaries = AssignmentService::summarize(storage.get_ref(), assignments).await?;
    Ok(HttpResponse::Ok().json(summaries))
}

#[post("/assignments")]
pub async fn create_assignment(
    auth_user: AuthUser,
    body: web::Json<AdminAssignmentRequest>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;

    let assignment =
        CohortService::create_assignment(storage.get_ref(), body.cohort_id, body.mentor_id, body.student_id)
            .await?;
    Ok(HttpResponse::Ok().json(assignment))
}

#[post("/assignments/bulk-delete")]
pub async fn bulk_delete_assignments(
    auth_user: AuthUser,
    body: web::Json<BulkDeleteRequest>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    if body.assignment_ids.is_empty() {
        return Err(AppError::BadRequest("assignmentIds must not be empty".to_string()));
    }

    let deleted = CohortService::bulk_delete_assignments(storage.get_ref(), &body.assignment_ids).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "deleted": deleted })))
}

#[delete("/assignments/{id}")]
pub async fn delete_assignment(
    auth_user: AuthUser,
    path: web::Path<i32>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    CohortService::delete_assignment(storage.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .service(update_user_role)
            .service(stats)
            .service(list_students)
            .service(create_student)
            .service(update_student_status)
            .service(get_student)
            .service(update_student)
            .service(delete_student)
            .service(list_mentors)
            .service(create_mentor)
            .service(update_mentor_status)
            .service(get_mentor)
            .service(update_mentor)
            .service(delete_mentor)
            .service(bulk_delete_assignments)
            .service(list_assignments)
            .service(create_assignment)
            .service(delete_assignment),
    );
}
