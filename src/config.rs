// Configuration du serveur (variables d'environnement, .env chargé par dotenv dans main)
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Backend de stockage choisi une fois au démarrage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres { database_url: String },
    Document,
}

impl StorageBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::Postgres { .. } => "postgres",
            StorageBackend::Document => "document",
        }
    }
}

/// Paramètres de vérification des bearer tokens
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

/// Liste blanche admin : emails semés au démarrage + secret de /api/seed-admin
#[derive(Debug, Clone, Default)]
pub struct AdminSettings {
    pub emails: Vec<String>,
    pub seed_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub auth: AuthSettings,
    pub admin: AdminSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Construit la config à partir d'une fonction de lecture (testable sans toucher à l'env)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Les valeurs vides comptent comme absentes
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw,
            })?,
            None => 8080,
        };

        let storage = match get("STORAGE_BACKEND").as_deref() {
            None | Some("postgres") => StorageBackend::Postgres {
                database_url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            Some("document") => StorageBackend::Document,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "STORAGE_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        let auth = AuthSettings {
            jwt_secret: get("AUTH_JWT_SECRET").ok_or(ConfigError::Missing("AUTH_JWT_SECRET"))?,
            issuer: get("AUTH_JWT_ISSUER"),
            audience: get("AUTH_JWT_AUDIENCE"),
        };

        let emails = get("ADMIN_EMAILS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            storage,
            auth,
            admin: AdminSettings {
                emails,
                seed_secret: get("ADMIN_SEED_SECRET"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_postgres_is_default_backend() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/aspirelink"),
            ("AUTH_JWT_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.storage,
            StorageBackend::Postgres {
                database_url: "postgres://localhost/aspirelink".to_string()
            }
        );
        assert!(config.admin.emails.is_empty());
        assert!(config.admin.seed_secret.is_none());
    }

    #[test]
    fn test_document_backend_and_admin_emails() {
        let config = AppConfig::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "document"),
            ("AUTH_JWT_SECRET", "s3cret"),
            ("PORT", "9000"),
            ("ADMIN_EMAILS", "a@example.com, b@example.com,,"),
        ]))
        .unwrap();

        assert_eq!(config.storage, StorageBackend::Document);
        assert_eq!(config.port, 9000);
        assert_eq!(config.admin.emails, vec!["a@example.com", "b@example.com"]);
    }

    #[test]
    fn test_missing_values_are_errors() {
        let err = AppConfig::from_lookup(lookup(&[("AUTH_JWT_SECRET", "s3cret")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));

        let err = AppConfig::from_lookup(lookup(&[("STORAGE_BACKEND", "document")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AUTH_JWT_SECRET")));

        let err = AppConfig::from_lookup(lookup(&[
            ("STORAGE_BACKEND", "firestore"),
            ("AUTH_JWT_SECRET", "s3cret"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "STORAGE_BACKEND", .. }));
    }
}
