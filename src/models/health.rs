use serde::Serialize;
use chrono::{DateTime, Utc};

/// Réponse de GET /api/health
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
    pub time: DateTime<Utc>,
}
