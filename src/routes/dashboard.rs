// Tableaux de bord mentor / étudiant : mêmes vues, perspective inversée
use actix_web::{get, web, HttpResponse};

use crate::errors::AppError;
use crate::middleware::{require_role, AuthUser};
use crate::services::{AssignmentService, Perspective};
use crate::storage::Storage;

async fn assignments_for(
    storage: &dyn Storage,
    auth_user: &AuthUser,
    perspective: Perspective,
) -> Result<HttpResponse, AppError> {
    let user = require_role(storage, auth_user, perspective.role()).await?;
    let views = AssignmentService::list_assignments_for_user(storage, &user, perspective).await?;
    Ok(HttpResponse::Ok().json(views))
}

async fn cohorts_for(
    storage: &dyn Storage,
    auth_user: &AuthUser,
    perspective: Perspective,
) -> Result<HttpResponse, AppError> {
    let user = require_role(storage, auth_user, perspective.role()).await?;
    let cohorts = AssignmentService::list_cohorts_for_user(storage, &user.id).await?;
    Ok(HttpResponse::Ok().json(cohorts))
}

#[get("/assignments")]
pub async fn mentor_assignments(
    auth_user: AuthUser,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    assignments_for(storage.get_ref(), &auth_user, Perspective::Mentor).await
}

#[get("/cohorts")]
pub async fn mentor_cohorts(
    auth_user: AuthUser,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    cohorts_for(storage.get_ref(), &auth_user, Perspective::Mentor).await
}

#[get("/assignments")]
pub async fn student_assignments(
    auth_user: AuthUser,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    assignments_for(storage.get_ref(), &auth_user, Perspective::Student).await
}

#[get("/cohorts")]
pub async fn student_cohorts(
    auth_user: AuthUser,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    cohorts_for(storage.get_ref(), &auth_user, Perspective::Student).await
}

pub fn dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/mentor")
            .service(mentor_assignments)
            .service(mentor_cohorts),
    )
    .service(
        web::scope("/student")
            .service(student_assignments)
            .service(student_cohorts),
    );
}
