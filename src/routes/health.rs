use actix_web::{get, web, HttpResponse};
use chrono::Utc;

use crate::models::health::HealthResponse;
use crate::storage::Storage;

#[get("/health")]
pub async fn health_check(storage: web::Data<dyn Storage>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage: storage.backend(),
        time: Utc::now(),
    })
}
