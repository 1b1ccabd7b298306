// tests/common/mod.rs
#![allow(dead_code)] // each test binary uses a different subset of helpers
use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;
use adlens::errors::AdLensError;
use adlens::models::{CopyAnalysis, CopyScore, DenseCaption, ImageTag};
use adlens::services::AnalysisBackend;
use adlens::services::analysis_api::ScorePromptOutcome;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;

/// One scripted response for a mock endpoint. `Wait` parks the call on a
/// oneshot so a test can resolve it after further requests have been made.
pub enum Script<T> {
    Ok(T),
    Err(String),
    Wait(oneshot::Receiver<Result<T, String>>),
}

pub struct Endpoint<T> {
    scripts: Mutex<VecDeque<Script<T>>>,
    calls: AtomicUsize,
}

impl<T> Endpoint<T> {
    fn new() -> Self {
        Self {
            scripts: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push_ok(&self, value: T) {
        self.scripts.lock().unwrap().push_back(Script::Ok(value));
    }

    pub fn push_err(&self, message: &str) {
        self.scripts
            .lock()
            .unwrap()
            .push_back(Script::Err(message.to_string()));
    }

    /// Queue a parked response; the returned sender resolves it later.
    pub fn push_wait(&self) -> oneshot::Sender<Result<T, String>> {
        let (tx, rx) = oneshot::channel();
        self.scripts.lock().unwrap().push_back(Script::Wait(rx));
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn invoke(&self) -> Result<T, AdLensError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .expect("mock endpoint called without a scripted response");
        match script {
            Script::Ok(value) => Ok(value),
            Script::Err(message) => Err(AdLensError::Upstream(message)),
            Script::Wait(rx) => rx
                .await
                .expect("test dropped the wait controller")
                .map_err(AdLensError::Upstream),
        }
    }
}

/// Scripted stand-in for the remote scoring/recommendation service.
pub struct MockBackend {
    pub headline: Endpoint<CopyScore>,
    pub description: Endpoint<CopyScore>,
    pub score_prompt: Endpoint<ScorePromptOutcome>,
    pub tags: Endpoint<Vec<ImageTag>>,
    pub captions: Endpoint<Vec<DenseCaption>>,
    pub generate: Endpoint<String>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            headline: Endpoint::new(),
            description: Endpoint::new(),
            score_prompt: Endpoint::new(),
            tags: Endpoint::new(),
            captions: Endpoint::new(),
            generate: Endpoint::new(),
        }
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    async fn headline(&self, _content: &str) -> Result<CopyScore, AdLensError> {
        self.headline.invoke().await
    }

    async fn description(&self, _content: &str) -> Result<CopyScore, AdLensError> {
        self.description.invoke().await
    }

    async fn score_prompt(
        &self,
        _image: Bytes,
        _filename: &str,
        _content_type: &str,
    ) -> Result<ScorePromptOutcome, AdLensError> {
        self.score_prompt.invoke().await
    }

    async fn tags(
        &self,
        _image: Bytes,
        _filename: &str,
        _content_type: &str,
    ) -> Result<Vec<ImageTag>, AdLensError> {
        self.tags.invoke().await
    }

    async fn dense_captions(
        &self,
        _image: Bytes,
        _filename: &str,
        _content_type: &str,
    ) -> Result<Vec<DenseCaption>, AdLensError> {
        self.captions.invoke().await
    }

    async fn generate(&self, _prompt: &str) -> Result<String, AdLensError> {
        self.generate.invoke().await
    }
}

pub fn tag(name: &str, confidence: f64) -> ImageTag {
    ImageTag {
        name: name.to_string(),
        confidence,
    }
}

pub fn caption(text: &str, confidence: f64) -> DenseCaption {
    DenseCaption {
        text: text.to_string(),
        confidence,
    }
}

pub fn copy_score(score: f64, recommendations: &[&str], improved: Option<&str>) -> CopyScore {
    CopyScore {
        score,
        recommendations: recommendations.iter().map(|s| s.to_string()).collect(),
        analysis: CopyAnalysis {
            keywords: vec!["team".into()],
            sentiment: "positive".into(),
            engagement_level: "high".into(),
            emoji_count: 0,
        },
        improved_version: improved.map(|s| s.to_string()),
    }
}

/// A tiny but genuinely decodable PNG.
pub fn png_bytes() -> Vec<u8> {
    let mut buf = Vec::new();
    let img = image::DynamicImage::new_rgba8(2, 2);
    img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// Build a raw multipart body with a single file part.
pub fn multipart_body(filename: &str, content_type: &str, data: &[u8]) -> (String, Vec<u8>) {
    let boundary = "----adlens-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

pub async fn upload<S, B>(app: &S, filename: &str, content_type: &str, data: &[u8]) -> u16
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (ct, body) = multipart_body(filename, content_type, data);
    let req = test::TestRequest::post()
        .uri("/api/v1/upload")
        .insert_header(("content-type", ct))
        .set_payload(body)
        .to_request();
    test::call_service(app, req).await.status().as_u16()
}

pub async fn view_json<S, B>(app: &S) -> serde_json::Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get()
        .uri("/api/v1/analysis")
        .to_request();
    test::call_and_read_body_json(app, req).await
}

/// Poll the analysis view until `pred` holds. Panics after two seconds.
pub async fn wait_for_view<S, B, F>(app: &S, pred: F) -> serde_json::Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    F: Fn(&serde_json::Value) -> bool,
{
    for _ in 0..40 {
        let view = view_json(app).await;
        if pred(&view) {
            return view;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("analysis view never reached the expected state");
}

pub fn settled(view: &serde_json::Value) -> bool {
    view["is_analyzing"] == serde_json::Value::Bool(false)
}
