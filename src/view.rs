// src/view.rs
//
// Presentation derivation: everything here is recomputed from a session
// snapshot on each request and never writes back, so rendering the same
// state twice produces identical output.
use crate::models::{StageStatus, StageState};
use crate::services::session::SessionSnapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Entries at or below this confidence are hidden from the ranked lists.
pub const CONFIDENCE_FLOOR: f64 = 0.7;

/// Frontend polls cycle loading messages on this interval. Cosmetic only.
pub const LOADING_INTERVAL_MS: u64 = 2000;

/// One displayable tag or caption, pre-formatted for the dashboard.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedEntry {
    pub label: String,
    pub confidence: f64,
    /// Confidence as a percentage with one decimal, e.g. "93.4".
    pub percent: String,
}

/// Filter to confidence strictly above the floor and order non-increasing.
/// The sort is stable so equal-confidence entries keep their arrival order.
pub fn rank(entries: impl IntoIterator<Item = (String, f64)>) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = entries
        .into_iter()
        .filter(|(_, confidence)| *confidence > CONFIDENCE_FLOOR)
        .map(|(label, confidence)| RankedEntry {
            label,
            percent: format_percent(confidence * 100.0),
            confidence,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// One decimal place, matching the dashboard's score and confidence labels.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}", value)
}

/// The full derived view of the active session. Option fields mirror result
/// absence: None means the stage has not succeeded, which the frontend
/// renders as a "no data" placeholder; an empty list is a successful result
/// with nothing above the confidence floor.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalysisView {
    pub payload_id: Uuid,
    pub filename: String,
    pub preview_url: String,
    pub uploaded_at: DateTime<Utc>,
    pub is_analyzing: bool,
    pub stages: StageStatus,
    pub score: Option<f64>,
    pub score_display: Option<String>,
    pub tags: Option<Vec<RankedEntry>>,
    pub captions: Option<Vec<RankedEntry>>,
    pub suggested_prompt: Option<String>,
    pub generated_image_url: Option<String>,
    pub can_generate: bool,
    pub error: Option<String>,
}

impl AnalysisView {
    pub fn from_snapshot(snap: &SessionSnapshot) -> Self {
        let tags = snap.result.tags.as_ref().map(|tags| {
            rank(tags
                .iter()
                .map(|t| (t.name.clone(), t.confidence)))
        });
        let captions = snap.result.captions.as_ref().map(|captions| {
            rank(captions
                .iter()
                .map(|c| (c.text.clone(), c.confidence)))
        });

        let can_generate = snap
            .result
            .suggested_prompt
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
            && snap.stages.get(crate::models::Stage::Generation) != StageState::Pending;

        AnalysisView {
            payload_id: snap.payload_id,
            filename: snap.filename.clone(),
            preview_url: format!("/api/v1/preview/{}", snap.payload_id),
            uploaded_at: snap.uploaded_at,
            is_analyzing: snap.stages.any_pending(),
            stages: snap.stages,
            score: snap.result.score,
            score_display: snap.result.score.map(format_percent),
            tags,
            captions,
            suggested_prompt: snap.result.suggested_prompt.clone(),
            generated_image_url: snap.result.generated_image_url.clone(),
            can_generate,
            error: snap.last_error.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LoadingMessage {
    pub main: &'static str,
    pub sub: &'static str,
}

pub const COPY_MESSAGES: &[LoadingMessage] = &[
    LoadingMessage {
        main: "Analyzing your copy...",
        sub: "Checking for engagement factors",
    },
    LoadingMessage {
        main: "AI at work...",
        sub: "Making your words shine ✨",
    },
    LoadingMessage {
        main: "Almost there...",
        sub: "Polishing every word",
    },
    LoadingMessage {
        main: "Getting creative...",
        sub: "Adding that special touch",
    },
    LoadingMessage {
        main: "Processing...",
        sub: "Making LinkedIn jealous 😉",
    },
];

pub const IMAGE_MESSAGES: &[LoadingMessage] = &[
    LoadingMessage {
        main: "Analyzing your image...",
        sub: "Looking for the perfect details",
    },
    LoadingMessage {
        main: "AI vision engaged...",
        sub: "Seeing things humans might miss",
    },
    LoadingMessage {
        main: "Processing pixels...",
        sub: "Making Instagram envious 📸",
    },
    LoadingMessage {
        main: "Almost there...",
        sub: "Finding the visual story",
    },
    LoadingMessage {
        main: "Analyzing composition...",
        sub: "Discovering the magic",
    },
];

pub const GENERATION_MESSAGES: &[LoadingMessage] = &[
    LoadingMessage {
        main: "Generating masterpiece...",
        sub: "Channeling our inner Picasso",
    },
    LoadingMessage {
        main: "AI brushes moving...",
        sub: "Creating digital magic ✨",
    },
    LoadingMessage {
        main: "Almost there...",
        sub: "Adding final touches",
    },
    LoadingMessage {
        main: "Processing...",
        sub: "Making art history 🎨",
    },
];
