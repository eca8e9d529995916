mod config;
mod db;
mod errors;
mod middleware;
mod models;
mod routes;
mod services;
mod storage;
mod utils;

use actix_web::{middleware::Logger, web, App, HttpServer};

use crate::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    log::info!("Opening {} storage...", config.storage.name());
    let storage = storage::connect(&config.storage)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    storage::seed_admins(storage.as_ref(), &config.admin.emails)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    let storage = web::Data::from(storage);
    let auth = web::Data::new(config.auth.clone());
    let admin = web::Data::new(config.admin.clone());

    log::info!("Starting server on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(storage.clone())
            .app_data(auth.clone())
            .app_data(admin.clone())
            .configure(routes::configure_routes)
    })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}
