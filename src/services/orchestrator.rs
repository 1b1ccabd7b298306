// src/services/orchestrator.rs
use crate::errors::AdLensError;
use crate::models::{Stage, StageUpdate, UploadedPayload};
use crate::services::analysis_api::AnalysisBackend;
use crate::services::session::SessionStore;
use log::{error, info};
use std::sync::Arc;
use uuid::Uuid;

/// Fans one uploaded payload out to the remote analysis stages and routes
/// their completions back into the session store. Stages are independent:
/// each settles on its own and a failure never touches its siblings.
pub struct Orchestrator {
    backend: Arc<dyn AnalysisBackend>,
    sessions: Arc<SessionStore>,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn AnalysisBackend>, sessions: Arc<SessionStore>) -> Self {
        Self { backend, sessions }
    }

    /// Replace the active session with `payload` and issue the three
    /// analysis stages concurrently. Returns the new payload id immediately;
    /// results arrive in the session store as the stage tasks settle.
    pub async fn start_analysis(&self, payload: UploadedPayload) -> Uuid {
        let id = self.sessions.replace(payload.clone()).await;
        info!(
            "Starting analysis pipeline for payload {} ({}, {} bytes)",
            id, payload.content_type, payload.size
        );

        self.spawn_stage(Stage::ScorePrompt, payload.clone());
        self.spawn_stage(Stage::Tags, payload.clone());
        self.spawn_stage(Stage::Captions, payload);
        id
    }

    /// Issue the deferred generation stage. Gated by the session store:
    /// requires an active session with a non-empty suggested prompt and no
    /// generation already pending.
    pub async fn start_generation(&self) -> Result<Uuid, AdLensError> {
        let (id, prompt) = self.sessions.begin_generation().await?;
        info!("Starting image generation for payload {}", id);

        let backend = Arc::clone(&self.backend);
        let sessions = Arc::clone(&self.sessions);
        tokio::spawn(async move {
            let outcome = backend.generate(&prompt).await;
            settle(
                &sessions,
                id,
                Stage::Generation,
                outcome.map(|url| StageUpdate::Generation { url }),
            )
            .await;
        });
        Ok(id)
    }

    fn spawn_stage(&self, stage: Stage, payload: UploadedPayload) {
        let backend = Arc::clone(&self.backend);
        let sessions = Arc::clone(&self.sessions);
        let id = payload.id;

        tokio::spawn(async move {
            let UploadedPayload {
                data,
                filename,
                content_type,
                ..
            } = payload;

            let outcome = match stage {
                Stage::ScorePrompt => backend
                    .score_prompt(data, &filename, &content_type)
                    .await
                    .map(|r| StageUpdate::ScorePrompt {
                        score: r.score * 100.0,
                        suggested_prompt: r.image_generation_prompt,
                    }),
                Stage::Tags => backend
                    .tags(data, &filename, &content_type)
                    .await
                    .map(StageUpdate::Tags),
                Stage::Captions => backend
                    .dense_captions(data, &filename, &content_type)
                    .await
                    .map(StageUpdate::Captions),
                // Generation is issued through start_generation only.
                Stage::Generation => unreachable!("generation is not part of the upload fan-out"),
            };

            settle(&sessions, id, stage, outcome).await;
        });
    }
}

async fn settle(
    sessions: &SessionStore,
    payload_id: Uuid,
    stage: Stage,
    outcome: Result<StageUpdate, AdLensError>,
) {
    match outcome {
        Ok(update) => {
            info!("{} stage settled for payload {}", stage.label(), payload_id);
            sessions.apply_success(payload_id, update).await;
        }
        Err(e) => {
            error!(
                "{} stage failed for payload {}: {}",
                stage.label(),
                payload_id,
                e
            );
            sessions.apply_failure(payload_id, stage, e.to_string()).await;
        }
    }
}
