use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::config::AuthSettings;
use crate::errors::AppError;
use crate::models::users::{self, UserRole};
use crate::storage::Storage;
use crate::utils::jwt;

/// Principal authentifié, tiré du bearer token du fournisseur d'identité.
/// Utilisé comme extracteur dans les routes protégées.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, AppError> {
    let settings = req.app_data::<web::Data<AuthSettings>>().ok_or_else(|| {
        log::error!("AuthSettings missing from app data");
        AppError::Unauthorized("Authentication is not configured".to_string())
    })?;

    // 1. Header Authorization
    let auth_header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

    // 2. Format "Bearer <token>"
    let token = auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid Authorization format (expected: Bearer <token>)".to_string())
    })?;

    // 3. Signature + exp (+ iss/aud si configurés)
    let claims = jwt::verify_token(token.trim(), settings)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

    Ok(AuthUser {
        uid: claims.sub,
        email: claims.email,
        display_name: claims.name,
    })
}

/// Vérifie que l'utilisateur courant a exactement le rôle demandé.
/// Utilisateur inconnu ou rôle différent -> 403.
pub async fn require_role(
    storage: &dyn Storage,
    auth_user: &AuthUser,
    role: UserRole,
) -> Result<users::Model, AppError> {
    match storage.get_user(&auth_user.uid).await? {
        Some(user) if user.role == role => Ok(user),
        Some(_) | None => Err(AppError::Forbidden(format!(
            "Access denied: {} role required",
            role.as_str()
        ))),
    }
}
