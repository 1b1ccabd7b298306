// src/main.rs
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use adlens::config::Config;
use adlens::services::HttpAnalysisService;
use adlens::{AppState, api_routes};
use log::info;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    info!("Starting adlens dashboard...");
    info!("Analysis service: {}", config.analysis_api_base_url);

    let backend = Arc::new(HttpAnalysisService::new(config.analysis_api_base_url.clone()));
    let app_state = AppState::new(backend, config.max_upload_bytes);

    let static_dir = config.static_dir.clone();
    info!("Starting HTTP server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(api_routes)
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
