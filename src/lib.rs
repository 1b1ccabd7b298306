// src/lib.rs
use actix_web::web;
use std::sync::Arc;

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod view;

use crate::services::{AnalysisBackend, ImageProbe, Orchestrator, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub orchestrator: Arc<Orchestrator>,
    pub backend: Arc<dyn AnalysisBackend>,
    pub image_probe: Arc<ImageProbe>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(backend: Arc<dyn AnalysisBackend>, max_upload_bytes: usize) -> Self {
        let sessions = Arc::new(SessionStore::new());
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::clone(&backend),
            Arc::clone(&sessions),
        ));
        Self {
            sessions,
            orchestrator,
            backend,
            image_probe: Arc::new(ImageProbe::new()),
            max_upload_bytes,
        }
    }
}

/// API routes, shared between the binary and the integration tests.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/upload", web::post().to(handlers::upload_image))
            .route("/analysis", web::get().to(handlers::analysis_view))
            .route("/preview/{payload_id}", web::get().to(handlers::preview))
            .route("/generate", web::post().to(handlers::generate_image))
            .route("/copy/headline", web::post().to(handlers::score_headline))
            .route(
                "/copy/description",
                web::post().to(handlers::score_description),
            )
            .route("/copy/tags", web::get().to(handlers::copy_tags))
            .route(
                "/loading-messages",
                web::get().to(handlers::loading_messages),
            ),
    )
    .route("/health", web::get().to(handlers::health_check));
}
