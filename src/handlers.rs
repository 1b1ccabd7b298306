// src/handlers.rs
use crate::{AppState, errors::AdLensError, models::UploadedPayload, view};
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use bytes::Bytes;
use futures_util::TryStreamExt;
use log::{info, warn};
use serde::Deserialize;
use uuid::Uuid;

/// Dynamic placeholder tags the copy editor offers as `%tag%` chips.
const DYNAMIC_TAGS: &[&str] = &[
    "company",
    "salary",
    "job_title",
    "location",
    "requirements",
    "benefits",
];

#[derive(Debug, Deserialize)]
pub struct CopyRequest {
    pub content: String,
}

/// Accept a dropped or picked file and start the analysis pipeline.
///
/// Exactly the first file part is considered; the rest of the form is
/// ignored. Invalid drops (non-image content type, undecodable bytes,
/// oversized data) are silently dropped with 204 and leave any existing
/// session untouched.
pub async fn upload_image(
    mut payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let Some(mut field) = payload.try_next().await? else {
        return Ok(HttpResponse::NoContent().finish());
    };

    let filename = field
        .content_disposition()
        .get_filename()
        .unwrap_or("upload")
        .to_string();

    let content_type = field
        .content_type()
        .map(|ct| ct.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    if !content_type.starts_with("image/") {
        info!("Ignoring non-image upload '{}' ({})", filename, content_type);
        return Ok(HttpResponse::NoContent().finish());
    }

    let mut image_data = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        image_data.extend_from_slice(&chunk);
        if image_data.len() > data.max_upload_bytes {
            warn!("Ignoring oversized upload '{}'", filename);
            return Ok(HttpResponse::NoContent().finish());
        }
    }

    let (width, height) = match data.image_probe.validate(&image_data) {
        Ok(dims) => dims,
        Err(e) => {
            warn!("Ignoring invalid upload '{}': {}", filename, e);
            return Ok(HttpResponse::NoContent().finish());
        }
    };

    let upload = UploadedPayload {
        id: Uuid::new_v4(),
        filename,
        content_type,
        size: image_data.len(),
        width,
        height,
        data: Bytes::from(image_data),
        uploaded_at: chrono::Utc::now(),
    };

    let id = data.orchestrator.start_analysis(upload).await;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "payload_id": id,
        "preview_url": format!("/api/v1/preview/{}", id)
    })))
}

/// Derived view of the active session, recomputed per request.
pub async fn analysis_view(data: web::Data<AppState>) -> Result<HttpResponse, AdLensError> {
    let snap = data.sessions.snapshot().await.ok_or(AdLensError::NoSession)?;
    Ok(HttpResponse::Ok().json(view::AnalysisView::from_snapshot(&snap)))
}

/// Serve the active payload's bytes as its preview. Ids of replaced payloads
/// 404 like any other unknown id.
pub async fn preview(
    path: web::Path<Uuid>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AdLensError> {
    let payload_id = path.into_inner();
    let (bytes, content_type) = data
        .sessions
        .preview(payload_id)
        .await
        .ok_or(AdLensError::NoSession)?;

    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}

/// Trigger the deferred generation stage for the active payload.
pub async fn generate_image(data: web::Data<AppState>) -> Result<HttpResponse, AdLensError> {
    let id = data.orchestrator.start_generation().await?;
    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "payload_id": id,
        "status": "generation started"
    })))
}

pub async fn score_headline(
    body: web::Json<CopyRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AdLensError> {
    let content = require_content(&body.content)?;
    let score = data.backend.headline(content).await?;
    Ok(HttpResponse::Ok().json(score))
}

pub async fn score_description(
    body: web::Json<CopyRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AdLensError> {
    let content = require_content(&body.content)?;
    let score = data.backend.description(content).await?;
    Ok(HttpResponse::Ok().json(score))
}

fn require_content(content: &str) -> Result<&str, AdLensError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AdLensError::Validation("content must not be blank".into()));
    }
    Ok(trimmed)
}

pub async fn copy_tags() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "tags": DYNAMIC_TAGS }))
}

pub async fn loading_messages() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "copy": view::COPY_MESSAGES,
        "image": view::IMAGE_MESSAGES,
        "generation": view::GENERATION_MESSAGES,
        "interval_ms": view::LOADING_INTERVAL_MS
    }))
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "adlens",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
