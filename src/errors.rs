// src/errors.rs
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdLensError {
    #[error("{0}")]
    Upstream(String),

    #[error("Failed to decode service response: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No active analysis session")]
    NoSession,

    #[error("{0} is already in progress")]
    StagePending(&'static str),
}

impl ResponseError for AdLensError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AdLensError::Upstream(_) => HttpResponse::BadGateway().json(serde_json::json!({
                "error": "Analysis service error",
                "message": self.to_string()
            })),
            AdLensError::Decode(_) => HttpResponse::BadGateway().json(serde_json::json!({
                "error": "Analysis service error",
                "message": self.to_string()
            })),
            AdLensError::Validation(_) => {
                HttpResponse::UnprocessableEntity().json(serde_json::json!({
                    "error": "Validation error",
                    "message": self.to_string()
                }))
            }
            AdLensError::NoSession => HttpResponse::NotFound().json(serde_json::json!({
                "error": "Not found",
                "message": self.to_string()
            })),
            AdLensError::StagePending(_) => HttpResponse::Conflict().json(serde_json::json!({
                "error": "Stage in progress",
                "message": self.to_string()
            })),
        }
    }
}
