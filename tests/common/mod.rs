//! Shared harness for router-level tests: fake collaborators and an
//! in-process app built around them.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use ytdigest::app::create_app;
use ytdigest::config::AppConfig;
use ytdigest::constants::cache as cache_constants;
use ytdigest::features::cache::TranscriptCache;
use ytdigest::features::rate_limiter::FixedWindowLimiter;
use ytdigest::providers::{
    ChatModel, LlmError, ProviderError, Snippet, Transcript, TranscriptProvider,
};
use ytdigest::state::AppState;
use ytdigest::utils::SystemClock;
use ytdigest::validate::{Language, VideoId};

#[derive(Clone, Copy)]
pub enum TranscriptOutcome {
    Found,
    NotFound,
    Disabled,
    Upstream,
    /// Never resolves, for exercising the upstream timeout.
    Hanging,
}

pub struct FakeTranscripts {
    pub outcome: TranscriptOutcome,
}

pub fn sample_transcript() -> Transcript {
    Transcript {
        snippets: vec![
            Snippet {
                text: "Bienvenue dans cette vidéo".into(),
                start: 0.0,
                duration: 2.5,
            },
            Snippet {
                text: "aujourd'hui on parle de Rust".into(),
                start: 2.5,
                duration: 3.0,
            },
            Snippet {
                text: "merci d'avoir regardé".into(),
                start: 5.5,
                duration: 1.5,
            },
        ],
    }
}

#[async_trait]
impl TranscriptProvider for FakeTranscripts {
    async fn fetch(&self, _id: &VideoId, lang: Language) -> Result<Transcript, ProviderError> {
        match self.outcome {
            TranscriptOutcome::Found => Ok(sample_transcript()),
            TranscriptOutcome::NotFound => Err(ProviderError::NotFound(lang.as_str().to_string())),
            TranscriptOutcome::Disabled => Err(ProviderError::Disabled),
            TranscriptOutcome::Upstream => {
                Err(ProviderError::Upstream("connection reset".to_string()))
            }
            TranscriptOutcome::Hanging => std::future::pending().await,
        }
    }
}

/// A model whose call never resolves, for exercising the upstream timeout.
pub struct HangingModel;

#[async_trait]
impl ChatModel for HangingModel {
    async fn complete(
        &self,
        _system: &str,
        _user: &str,
        _json_output: bool,
    ) -> Result<String, LlmError> {
        std::future::pending().await
    }
}

pub struct FakeModel {
    pub response: String,
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl FakeModel {
    pub fn returning(response: &str) -> Arc<Self> {
        Arc::new(Self {
            response: response.to_string(),
            calls: AtomicUsize::new(0),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            response: String::new(),
            calls: AtomicUsize::new(0),
            fail: true,
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for FakeModel {
    async fn complete(
        &self,
        _system: &str,
        _user: &str,
        _json_output: bool,
    ) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LlmError::Api("API Error".to_string()));
        }
        Ok(self.response.clone())
    }
}

pub fn test_state(
    transcripts: Arc<dyn TranscriptProvider>,
    model: Arc<dyn ChatModel>,
) -> Arc<AppState> {
    let clock = Arc::new(SystemClock);
    Arc::new(AppState {
        config: AppConfig {
            openai_api_key: "test-key".to_string(),
            youtube_api_key: None,
            port: 0,
            model: "gpt-4-turbo".to_string(),
        },
        cache: TranscriptCache::new(
            cache_constants::MAX_CAPACITY,
            Duration::from_secs(cache_constants::TTL_SECONDS),
            clock.clone(),
        ),
        rate_limiter: Arc::new(FixedWindowLimiter::new(clock.clone())),
        transcripts,
        model,
        clock,
    })
}

pub fn test_app(
    transcripts: Arc<dyn TranscriptProvider>,
    model: Arc<dyn ChatModel>,
) -> (Router, Arc<AppState>) {
    let state = test_state(transcripts, model);
    (create_app(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router call failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read response body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub async fn post_json(app: &Router, uri: &str, body: Value, ip: &str) -> (StatusCode, Value) {
    let addr: SocketAddr = format!("{ip}:4242").parse().expect("bad test ip");
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .extension(ConnectInfo(addr))
        .body(Body::from(body.to_string()))
        .expect("failed to build request");
    send(app, request).await
}

/// POST with no body at all, for exercising body rejections.
pub async fn post_empty(app: &Router, uri: &str, ip: &str) -> (StatusCode, Value) {
    let addr: SocketAddr = format!("{ip}:4242").parse().expect("bad test ip");
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .extension(ConnectInfo(addr))
        .body(Body::empty())
        .expect("failed to build request");
    send(app, request).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let addr: SocketAddr = "127.0.0.1:4242".parse().expect("bad test ip");
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .extension(ConnectInfo(addr))
        .body(Body::empty())
        .expect("failed to build request");
    send(app, request).await
}
