// ============================================================================
// ROUTES : COHORTES (admin)
// ============================================================================
//
// Endpoints:
//   - GET/POST          /api/cohorts
//   - GET/PUT/DELETE    /api/cohorts/{id}
//   - GET/POST          /api/cohorts/{id}/members
//   - DELETE            /api/cohorts/{id}/members/{user_id}
//   - GET/POST          /api/cohorts/{id}/assignments
//   - GET               /api/cohorts/{id}/sessions
//
// ============================================================================

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::{require_role, AuthUser};
use crate::models::cohort::{CohortPatch, NewCohort};
use crate::models::cohort_member::NewCohortMember;
use crate::models::dto::{AddMemberRequest, CohortAssignmentRequest};
use crate::models::users::UserRole;
use crate::services::{AssignmentService, CohortService};
use crate::storage::{Storage, StorageError};

async fn require_admin(storage: &dyn Storage, auth_user: &AuthUser) -> Result<(), AppError> {
    require_role(storage, auth_user, UserRole::Admin).await.map(|_| ())
}

#[post("")]
pub async fn create_cohort(
    auth_user: AuthUser,
    body: web::Json<NewCohort>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    body.validate().map_err(|e| AppError::validation("cohort", e))?;

    let cohort = storage.create_cohort(body.into_inner()).await?;
    log::info!("Cohort #{} '{}' created", cohort.id, cohort.name);
    Ok(HttpResponse::Ok().json(cohort))
}

#[get("")]
pub async fn list_cohorts(
    auth_user: AuthUser,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    Ok(HttpResponse::Ok().json(storage.list_cohorts().await?))
}

#[get("/{id}")]
pub async fn get_cohort(
    auth_user: AuthUser,
    path: web::Path<i32>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    let id = path.into_inner();

    let cohort = storage
        .get_cohort(id)
        .await?
        .ok_or_else(|| StorageError::not_found("cohort", id))?;
    Ok(HttpResponse::Ok().json(cohort))
}

#[put("/{id}")]
pub async fn update_cohort(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<CohortPatch>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    body.validate().map_err(|e| AppError::validation("cohort", e))?;

    let cohort = CohortService::update_cohort(storage.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(cohort))
}

#[delete("/{id}")]
pub async fn delete_cohort(
    auth_user: AuthUser,
    path: web::Path<i32>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    CohortService::delete_cohort(storage.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[get("/{id}/members")]
pub async fn list_members(
    auth_user: AuthUser,
    path: web::Path<i32>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    let members = CohortService::list_members(storage.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(members))
}

#[post("/{id}/members")]
pub async fn add_member(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<AddMemberRequest>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    body.validate().map_err(|e| AppError::validation("member", e))?;
    let cohort_id = path.into_inner();

    if storage.get_cohort(cohort_id).await?.is_none() {
        return Err(StorageError::not_found("cohort", cohort_id).into());
    }

    let body = body.into_inner();
    let member = storage
        .add_cohort_member(NewCohortMember {
            cohort_id,
            user_id: body.user_id,
            role: body.role,
        })
        .await?;
    Ok(HttpResponse::Ok().json(member))
}

#[delete("/{id}/members/{user_id}")]
pub async fn remove_member(
    auth_user: AuthUser,
    path: web::Path<(i32, String)>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    let (cohort_id, user_id) = path.into_inner();

    storage.remove_cohort_member(cohort_id, &user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[get("/{id}/assignments")]
pub async fn list_assignments(
    auth_user: AuthUser,
    path: web::Path<i32>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;

    let assignments = storage.list_assignments_by_cohort(path.into_inner()).await?;
    let summaries = AssignmentService::summarize(storage.get_ref(), assignments).await?;
    Ok(HttpResponse::Ok().json(summaries))
}

#[post("/{id}/assignments")]
pub async fn create_assignment(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<CohortAssignmentRequest>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;

    let assignment =
        CohortService::create_assignment(storage.get_ref(), path.into_inner(), body.mentor_id, body.student_id)
            .await?;
    Ok(HttpResponse::Ok().json(assignment))
}

#[get("/{id}/sessions")]
pub async fn list_sessions(
    auth_user: AuthUser,
    path: web::Path<i32>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_admin(storage.get_ref(), &auth_user).await?;
    Ok(HttpResponse::Ok().json(storage.list_sessions_by_cohort(path.into_inner()).await?))
}

pub fn cohort_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cohorts")
            .service(create_cohort)
            .service(list_cohorts)
            .service(list_members)
            .service(add_member)
            .service(remove_member)
            .service(list_assignments)
            .service(create_assignment)
            .service(list_sessions)
            .service(get_cohort)
            .service(update_cohort)
            .service(delete_cohort),
    );
}
