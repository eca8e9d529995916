use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::{require_role, AuthUser};
use crate::models::contact::NewContact;
use crate::models::dto::CreatedResponse;
use crate::models::users::UserRole;
use crate::storage::Storage;
use crate::utils::email::normalize_email;

/// POST /api/contact - Formulaire de contact public
#[post("/contact")]
pub async fn submit_contact(
    body: web::Json<NewContact>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    let mut contact = body.into_inner();
    contact.email = normalize_email(&contact.email);
    contact
        .validate()
        .map_err(|e| AppError::validation("form data", e))?;

    let created = storage.create_contact(contact).await?;
    Ok(HttpResponse::Ok().json(CreatedResponse {
        success: true,
        id: created.id,
    }))
}

/// GET /api/contacts - Boîte de réception (admin)
#[get("/contacts")]
pub async fn list_contacts(
    auth_user: AuthUser,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    require_role(storage.get_ref(), &auth_user, UserRole::Admin).await?;
    Ok(HttpResponse::Ok().json(storage.list_contacts().await?))
}

pub fn contact_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_contact).service(list_contacts);
}
