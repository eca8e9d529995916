use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthSettings;

/// Claims du token émis par le fournisseur d'identité.
/// `sub` = uid externe, clé des utilisateurs en base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exp: i64, // expiration timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

fn validation_for(settings: &AuthSettings) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    // iss/aud ne sont vérifiés que s'ils sont présents : on les exige quand ils sont configurés
    let mut required = vec!["exp"];
    if let Some(issuer) = &settings.issuer {
        validation.set_issuer(&[issuer]);
        required.push("iss");
    }
    match &settings.audience {
        Some(audience) => {
            validation.set_audience(&[audience]);
            required.push("aud");
        }
        None => validation.validate_aud = false,
    }
    validation.set_required_spec_claims(&required);
    validation
}

/// Vérifie et décode un bearer token (signature HS256, exp, iss/aud si configurés)
pub fn verify_token(token: &str, settings: &AuthSettings) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &validation_for(settings),
    )
        .map(|data| data.claims)
}

/// Génère un token signé comme le ferait le fournisseur d'identité (tests)
#[cfg(test)]
pub fn issue_token(
    settings: &AuthSettings,
    uid: &str,
    email: Option<&str>,
    name: Option<&str>,
) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = Claims {
        sub: uid.to_string(),
        email: email.map(str::to_string),
        name: name.map(str::to_string),
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
        iss: settings.issuer.clone(),
        aud: settings.audience.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: "test-secret".to_string(),
            issuer: None,
            audience: None,
        }
    }

    #[test]
    fn test_issue_and_verify_token() {
        let settings = settings();
        let token = issue_token(&settings, "uid-123", Some("jane@example.com"), Some("Jane Doe"));
        let claims = verify_token(&token, &settings).unwrap();

        assert_eq!(claims.sub, "uid-123");
        assert_eq!(claims.email.as_deref(), Some("jane@example.com"));
        assert_eq!(claims.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_invalid_token() {
        assert!(verify_token("invalid.token.here", &settings()).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(&settings(), "uid-123", None, None);
        let other = AuthSettings {
            jwt_secret: "other-secret".to_string(),
            ..settings()
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn test_issuer_checked_when_configured() {
        let issuer_settings = AuthSettings {
            issuer: Some("https://idp.example.com".to_string()),
            ..settings()
        };
        let good = issue_token(&issuer_settings, "uid-1", None, None);
        assert!(verify_token(&good, &issuer_settings).is_ok());

        let no_issuer = issue_token(&settings(), "uid-1", None, None);
        assert!(verify_token(&no_issuer, &issuer_settings).is_err());
    }

    #[test]
    fn test_audience_checked_when_configured() {
        let audience_settings = AuthSettings {
            audience: Some("aspirelink".to_string()),
            ..settings()
        };
        let good = issue_token(&audience_settings, "uid-1", None, None);
        assert!(verify_token(&good, &audience_settings).is_ok());

        let no_audience = issue_token(&settings(), "uid-1", None, None);
        assert!(verify_token(&no_audience, &audience_settings).is_err());

        let other = AuthSettings {
            audience: Some("another-app".to_string()),
            ..settings()
        };
        let wrong_audience = issue_token(&other, "uid-1", None, None);
        assert!(verify_token(&wrong_audience, &audience_settings).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let issuer_settings = AuthSettings {
            issuer: Some("https://idp.example.com".to_string()),
            ..settings()
        };
        let other = AuthSettings {
            issuer: Some("https://evil.example.com".to_string()),
            ..settings()
        };
        let token = issue_token(&other, "uid-1", None, None);
        assert!(verify_token(&token, &issuer_settings).is_err());
    }
}
