// src/models.rs
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The single image submitted for analysis. Replaced wholesale on every new
/// upload; stage tasks hold a cheap `Bytes` clone of the data.
#[derive(Debug, Clone)]
pub struct UploadedPayload {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub size: usize,
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ScorePrompt,
    Tags,
    Captions,
    Generation,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::ScorePrompt => "Score",
            Stage::Tags => "Tags",
            Stage::Captions => "Captions",
            Stage::Generation => "Generation",
        }
    }
}

/// Lifecycle of one remote call. Pending doubles as an advisory lock: a stage
/// that is already Pending must not be issued again for the same payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct StageStatus {
    pub score_prompt: StageState,
    pub tags: StageState,
    pub captions: StageState,
    pub generation: StageState,
}

impl StageStatus {
    pub fn get(&self, stage: Stage) -> StageState {
        match stage {
            Stage::ScorePrompt => self.score_prompt,
            Stage::Tags => self.tags,
            Stage::Captions => self.captions,
            Stage::Generation => self.generation,
        }
    }

    pub fn set(&mut self, stage: Stage, state: StageState) {
        match stage {
            Stage::ScorePrompt => self.score_prompt = state,
            Stage::Tags => self.tags = state,
            Stage::Captions => self.captions = state,
            Stage::Generation => self.generation = state,
        }
    }

    pub fn any_pending(&self) -> bool {
        [self.score_prompt, self.tags, self.captions, self.generation]
            .iter()
            .any(|s| *s == StageState::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageTag {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DenseCaption {
    pub text: String,
    pub confidence: f64,
}

/// Aggregate of independently arriving stage outputs. Every field stays None
/// until its stage succeeds; None means "not yet / failed", never "empty".
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    /// 0-100, derived from the service's 0-1 score.
    pub score: Option<f64>,
    pub tags: Option<Vec<ImageTag>>,
    pub captions: Option<Vec<DenseCaption>>,
    pub suggested_prompt: Option<String>,
    pub generated_image_url: Option<String>,
}

/// A settled stage output, routed back to the session store together with the
/// payload id it was computed for.
#[derive(Debug, Clone)]
pub enum StageUpdate {
    ScorePrompt { score: f64, suggested_prompt: String },
    Tags(Vec<ImageTag>),
    Captions(Vec<DenseCaption>),
    Generation { url: String },
}

impl StageUpdate {
    pub fn stage(&self) -> Stage {
        match self {
            StageUpdate::ScorePrompt { .. } => Stage::ScorePrompt,
            StageUpdate::Tags(_) => Stage::Tags,
            StageUpdate::Captions(_) => Stage::Captions,
            StageUpdate::Generation { .. } => Stage::Generation,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CopyAnalysis {
    pub keywords: Vec<String>,
    pub sentiment: String,
    pub engagement_level: String,
    pub emoji_count: u32,
}

/// Normalized copy-scoring result returned to the frontend as-is.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CopyScore {
    pub score: f64,
    pub recommendations: Vec<String>,
    pub analysis: CopyAnalysis,
    pub improved_version: Option<String>,
}
