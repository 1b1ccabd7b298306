// src/services/analysis_api.rs
use crate::errors::AdLensError;
use crate::models::{CopyAnalysis, CopyScore, DenseCaption, ImageTag};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Successful score+prompt stage output, already decoded from the wire.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScorePromptOutcome {
    /// Service-reported score in [0,1].
    pub score: f64,
    #[serde(default)]
    pub image_generation_prompt: String,
}

/// Everything the remote scoring/recommendation service can do. Handlers and
/// the orchestrator only see this trait so tests can substitute a mock.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn headline(&self, content: &str) -> Result<CopyScore, AdLensError>;
    async fn description(&self, content: &str) -> Result<CopyScore, AdLensError>;
    async fn score_prompt(
        &self,
        image: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<ScorePromptOutcome, AdLensError>;
    async fn tags(
        &self,
        image: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<Vec<ImageTag>, AdLensError>;
    async fn dense_captions(
        &self,
        image: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<Vec<DenseCaption>, AdLensError>;
    async fn generate(&self, prompt: &str) -> Result<String, AdLensError>;
}

/// The service returns confidence lists either bare or wrapped in
/// `{"values": [...]}`. This is the only place that distinction exists;
/// everything downstream sees a plain Vec.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Wrapped { values: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Wrapped { values } => values,
            Listing::Bare(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CopyResponse {
    analysis: CopyAnalysisWire,
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    improved_version: Option<ImprovedVersion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CopyAnalysisWire {
    performance_score: f64,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    sentiment: String,
    #[serde(default)]
    engagement_level: String,
    #[serde(default)]
    emoji_count: u32,
}

#[derive(Debug, Deserialize)]
struct ImprovedVersion {
    content: String,
}

impl From<CopyResponse> for CopyScore {
    fn from(wire: CopyResponse) -> Self {
        CopyScore {
            score: wire.analysis.performance_score,
            recommendations: wire.suggestions,
            analysis: CopyAnalysis {
                keywords: wire.analysis.keywords,
                sentiment: wire.analysis.sentiment,
                engagement_level: wire.analysis.engagement_level,
                emoji_count: wire.analysis.emoji_count,
            },
            improved_version: wire.improved_version.map(|v| v.content),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    url: String,
}

pub struct HttpAnalysisService {
    base_url: String,
    client: Client,
}

impl HttpAnalysisService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    async fn post_text<T: DeserializeOwned>(
        &self,
        path: &str,
        what: &str,
        content: &str,
    ) -> Result<T, AdLensError> {
        // The service expects a raw JSON string as the body.
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&content)
            .send()
            .await
            .map_err(|e| AdLensError::Upstream(format!("{} request failed: {}", what, e)))?;

        decode(response, what).await
    }

    async fn post_image<T: DeserializeOwned>(
        &self,
        path: &str,
        what: &str,
        image: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<T, AdLensError> {
        let part = Part::stream(reqwest::Body::from(image))
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| AdLensError::Validation(format!("bad content type: {}", e)))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AdLensError::Upstream(format!("{} request failed: {}", what, e)))?;

        decode(response, what).await
    }
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<T, AdLensError> {
    let status = response.status();
    if !status.is_success() {
        return Err(AdLensError::Upstream(format!(
            "{} API error: {}",
            what, status
        )));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| AdLensError::Decode(format!("{} response: {}", what, e)))
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisService {
    async fn headline(&self, content: &str) -> Result<CopyScore, AdLensError> {
        let wire: CopyResponse = self
            .post_text("/api/Copy/headline", "Headline", content)
            .await?;
        Ok(wire.into())
    }

    async fn description(&self, content: &str) -> Result<CopyScore, AdLensError> {
        let wire: CopyResponse = self
            .post_text("/api/Copy/description", "Description", content)
            .await?;
        Ok(wire.into())
    }

    async fn score_prompt(
        &self,
        image: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<ScorePromptOutcome, AdLensError> {
        self.post_image(
            "/api/ImageRecommendation/analyze-file",
            "Score",
            image,
            filename,
            content_type,
        )
        .await
    }

    async fn tags(
        &self,
        image: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<Vec<ImageTag>, AdLensError> {
        let listing: Listing<ImageTag> = self
            .post_image(
                "/api/ImageAnalysis/tags-file",
                "Tags",
                image,
                filename,
                content_type,
            )
            .await?;
        Ok(listing.into_vec())
    }

    async fn dense_captions(
        &self,
        image: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<Vec<DenseCaption>, AdLensError> {
        let listing: Listing<DenseCaption> = self
            .post_image(
                "/api/ImageAnalysis/dense-captions-file",
                "Captions",
                image,
                filename,
                content_type,
            )
            .await?;
        Ok(listing.into_vec())
    }

    async fn generate(&self, prompt: &str) -> Result<String, AdLensError> {
        let wire: GenerationResponse = self
            .post_text("/api/ImageRecommendation/generate", "Generation", prompt)
            .await?;
        Ok(wire.url)
    }
}
