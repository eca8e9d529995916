use actix_web::{delete, get, post, route, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::{require_role, AuthUser};
use crate::models::dto::CreateSessionRequest;
use crate::models::mentoring_session::SessionPatch;
use crate::models::users::UserRole;
use crate::services::SessionService;
use crate::storage::Storage;

/// POST /api/sessions - Le mentor planifie une session sur son binôme
#[post("")]
pub async fn create_session(
    auth_user: AuthUser,
    body: web::Json<CreateSessionRequest>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    let mentor = require_role(storage.get_ref(), &auth_user, UserRole::Mentor).await?;
    body.validate().map_err(|e| AppError::validation("session", e))?;

    let session = SessionService::create_session(storage.get_ref(), &mentor, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(session))
}

/// PUT ou PATCH /api/sessions/{id} - Replanification, notes, statut
#[route("/{id}", method = "PUT", method = "PATCH")]
pub async fn update_session(
    _auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<SessionPatch>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    body.validate().map_err(|e| AppError::validation("session", e))?;

    let session = SessionService::update_session(storage.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(session))
}

#[delete("/{id}")]
pub async fn delete_session(
    _auth_user: AuthUser,
    path: web::Path<i32>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    SessionService::delete_session(storage.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// GET /api/assignments/{id}/sessions
#[get("/assignments/{id}/sessions")]
pub async fn list_assignment_sessions(
    _auth_user: AuthUser,
    path: web::Path<i32>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(storage.list_sessions_by_assignment(path.into_inner()).await?))
}

pub fn session_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_assignment_sessions).service(
        web::scope("/sessions")
            .service(create_session)
            .service(update_session)
            .service(delete_session),
    );
}
