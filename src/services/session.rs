// src/services/session.rs
use crate::errors::AdLensError;
use crate::models::{
    AnalysisResult, Stage, StageState, StageStatus, StageUpdate, UploadedPayload,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use tokio::sync::RwLock;
use uuid::Uuid;

/// One analysis session: the active payload plus everything the stages have
/// produced for it so far.
#[derive(Debug)]
pub struct Session {
    pub payload: UploadedPayload,
    pub result: AnalysisResult,
    pub stages: StageStatus,
    /// Latest failing stage's message; cleared on new upload.
    pub last_error: Option<String>,
}

/// Read-only copy handed to the view layer.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub payload_id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
    pub result: AnalysisResult,
    pub stages: StageStatus,
    pub last_error: Option<String>,
}

/// Single-slot in-memory store. The slot is replaced wholesale on upload and
/// all stage completions are applied through it with the payload id they were
/// computed for, so responses from a replaced payload are dropped instead of
/// bleeding into the new session.
pub struct SessionStore {
    inner: RwLock<Option<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Discard any previous session and start a fresh one for `payload`.
    /// The three analysis stages are marked Pending up front since their
    /// requests are issued immediately after; generation stays Idle.
    pub async fn replace(&self, payload: UploadedPayload) -> Uuid {
        let id = payload.id;
        let mut stages = StageStatus::default();
        stages.set(Stage::ScorePrompt, StageState::Pending);
        stages.set(Stage::Tags, StageState::Pending);
        stages.set(Stage::Captions, StageState::Pending);

        let mut guard = self.inner.write().await;
        if let Some(old) = guard.as_ref() {
            debug!("Replacing session for payload {}", old.payload.id);
        }
        *guard = Some(Session {
            payload,
            result: AnalysisResult::default(),
            stages,
            last_error: None,
        });
        id
    }

    /// Apply a successful stage completion. No-op when `payload_id` no longer
    /// matches the active session.
    pub async fn apply_success(&self, payload_id: Uuid, update: StageUpdate) -> bool {
        let mut guard = self.inner.write().await;
        let Some(session) = guard.as_mut().filter(|s| s.payload.id == payload_id) else {
            warn!(
                "Dropping stale {} result for payload {}",
                update.stage().label(),
                payload_id
            );
            return false;
        };

        session.stages.set(update.stage(), StageState::Succeeded);
        match update {
            StageUpdate::ScorePrompt {
                score,
                suggested_prompt,
            } => {
                session.result.score = Some(score);
                let prompt = suggested_prompt.trim();
                if !prompt.is_empty() {
                    session.result.suggested_prompt = Some(prompt.to_string());
                }
            }
            StageUpdate::Tags(tags) => session.result.tags = Some(tags),
            StageUpdate::Captions(captions) => session.result.captions = Some(captions),
            StageUpdate::Generation { url } => session.result.generated_image_url = Some(url),
        }
        true
    }

    /// Record a stage failure: the stage settles as Failed, its result field
    /// stays absent, and the session-wide error is overwritten. Stale
    /// failures are dropped like stale successes.
    pub async fn apply_failure(&self, payload_id: Uuid, stage: Stage, message: String) -> bool {
        let mut guard = self.inner.write().await;
        let Some(session) = guard.as_mut().filter(|s| s.payload.id == payload_id) else {
            warn!(
                "Dropping stale {} failure for payload {}",
                stage.label(),
                payload_id
            );
            return false;
        };

        session.stages.set(stage, StageState::Failed);
        session.last_error = Some(message);
        true
    }

    /// Atomically gate the generation stage: requires an active session, a
    /// non-empty suggested prompt, and no generation already in flight.
    /// On success the stage is marked Pending before the lock is released.
    pub async fn begin_generation(&self) -> Result<(Uuid, String), AdLensError> {
        let mut guard = self.inner.write().await;
        let session = guard.as_mut().ok_or(AdLensError::NoSession)?;

        let prompt = session
            .result
            .suggested_prompt
            .clone()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| {
                AdLensError::Validation("no suggested prompt available for generation".into())
            })?;

        if session.stages.get(Stage::Generation) == StageState::Pending {
            return Err(AdLensError::StagePending("image generation"));
        }

        session.stages.set(Stage::Generation, StageState::Pending);
        Ok((session.payload.id, prompt))
    }

    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        let guard = self.inner.read().await;
        guard.as_ref().map(|s| SessionSnapshot {
            payload_id: s.payload.id,
            filename: s.payload.filename.clone(),
            content_type: s.payload.content_type.clone(),
            uploaded_at: s.payload.uploaded_at,
            result: s.result.clone(),
            stages: s.stages,
            last_error: s.last_error.clone(),
        })
    }

    /// Preview bytes for the active payload; None for any other id.
    pub async fn preview(&self, payload_id: Uuid) -> Option<(Bytes, String)> {
        let guard = self.inner.read().await;
        guard
            .as_ref()
            .filter(|s| s.payload.id == payload_id)
            .map(|s| (s.payload.data.clone(), s.payload.content_type.clone()))
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
