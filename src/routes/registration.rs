use actix_web::{get, post, web, HttpResponse};

use crate::errors::AppError;
use crate::middleware::{require_role, AuthUser};
use crate::models::dto::CreatedResponse;
use crate::models::mentor_registration::NewMentorRegistration;
use crate::models::student_registration::NewStudentRegistration;
use crate::models::users::UserRole;
use crate::services::RegistrationService;
use crate::storage::Storage;

/// POST /api/mentor-registration - Formulaire public
#[post("/mentor-registration")]
pub async fn submit_mentor_registration(
    body: web::Json<NewMentorRegistration>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    let created = RegistrationService::submit_mentor(storage.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(CreatedResponse {
        success: true,
        id: created.id,
    }))
}

/// POST /api/student-registration - Formulaire public
#[post("/student-registration")]
pub async fn submit_student_registration(
    body: web::Json<NewStudentRegistration>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    let created = RegistrationService::submit_student(storage.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(CreatedResponse {
        success: true,
        id: created.id,
    }))
}

#[get("/mentor-registrations")]
pub async fn list_mentor_registrations(
    auth_user: AuthUser,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_role(storage.get_ref(), &auth_user, UserRole::Admin).await?;
    Ok(HttpResponse::Ok().json(storage.list_mentor_registrations().await?))
}

#[get("/student-registrations")]
pub async fn list_student_registrations(
    auth_user: AuthUser,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_role(storage.get_ref(), &auth_user, UserRole::Admin).await?;
    Ok(HttpResponse::Ok().json(storage.list_student_registrations().await?))
}

pub fn registration_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_mentor_registration)
        .service(submit_student_registration)
        .service(list_mentor_registrations)
        .service(list_student_registrations);
}
