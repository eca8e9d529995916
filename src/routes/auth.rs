use actix_web::{get, post, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::config::AdminSettings;
use crate::errors::AppError;
use crate::middleware::AuthUser;
use crate::models::dto::{CheckEmailRequest, RegisterUserRequest, SeedAdminRequest};
use crate::models::users::NewUser;
use crate::services::IdentityService;
use crate::storage::Storage;
use crate::utils::email::normalize_email;

/// GET /api/auth/user - Utilisateur courant (crée + lie l'inscription au besoin)
#[get("/user")]
pub async fn current_user(
    auth_user: AuthUser,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    let user = IdentityService::resolve_current_user(storage.get_ref(), &auth_user).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// POST /api/auth/register - Crée ou complète le profil de l'utilisateur courant
#[post("/register")]
pub async fn register_user(
    auth_user: AuthUser,
    body: web::Json<RegisterUserRequest>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    // Le body a priorité sur les claims du token
    let user = storage
        .upsert_user(NewUser {
            id: auth_user.uid,
            email: body.email.or(auth_user.email).as_deref().map(normalize_email),
            full_name: body.display_name.or(auth_user.display_name),
        })
        .await?;

    Ok(HttpResponse::Ok().json(user))
}

/// POST /api/check-email-registration - Public, avant la connexion
#[post("/check-email-registration")]
pub async fn check_email_registration(
    body: web::Json<CheckEmailRequest>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    let mut body = body.into_inner();
    body.email = normalize_email(&body.email);
    if body.email.is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }
    body.validate().map_err(|e| AppError::validation("email", e))?;

    let response = IdentityService::check_email_registration(storage.get_ref(), &body.email).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Comparaison en temps constant (ne dépend que de la longueur)
fn secrets_match(given: &str, expected: &str) -> bool {
    let (given, expected) = (given.as_bytes(), expected.as_bytes());
    if given.len() != expected.len() {
        return false;
    }
    given.iter().zip(expected).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
}

/// POST /api/seed-admin - Ajoute un email à la liste blanche (protégé par secret)
#[post("/seed-admin")]
pub async fn seed_admin(
    body: web::Json<SeedAdminRequest>,
    admin: web::Data<AdminSettings>,
    storage: web::Data<dyn Storage>,
) -> Result<HttpResponse, AppError> {
    let Some(secret) = admin.seed_secret.as_deref() else {
        return Err(AppError::Forbidden("Admin seeding is disabled".to_string()));
    };
    if !secrets_match(&body.secret_key, secret) {
        log::warn!("Rejected admin seeding attempt with an invalid secret");
        return Err(AppError::Forbidden("Invalid secret key".to_string()));
    }

    let mut body = body.into_inner();
    body.email = normalize_email(&body.email);
    body.validate()
        .map_err(|e| AppError::validation("admin email", e))?;

    if let Some(existing) = storage.get_admin_by_email(&body.email).await? {
        return Ok(HttpResponse::Ok().json(json!({
            "message": "Admin already exists",
            "admin": existing
        })));
    }

    let created = storage.create_admin(&body.email).await?;
    log::info!("Created admin allow-list entry {}", created.email);

    Ok(HttpResponse::Ok().json(json!({
        "message": "Admin created successfully",
        "admin": created
    })))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(check_email_registration)
        .service(seed_admin)
        .service(
            web::scope("/auth")
                .service(current_user)
                .service(register_user),
        );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_match() {
        assert!(secrets_match("seed-me", "seed-me"));
        assert!(!secrets_match("seed-mf", "seed-me"));
        assert!(!secrets_match("seed", "seed-me"));
        assert!(!secrets_match("", "seed-me"));
    }
}
