//! HTTP handlers for the analysis endpoints.
//!
//! Every analysis request runs the same admission sequence: field validation,
//! rate limiting, cache lookup. Only then are the transcript provider and the
//! model called, both under a bounded timeout, and the result cached.

use std::future::Future;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use axum_client_ip::ClientIp;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use crate::constants::upstream;
use crate::errors::AppError;
use crate::prompts;
use crate::providers::Transcript;
use crate::state::AppState;
use crate::validate::{Language, VideoId};

#[derive(Debug, Clone, Copy)]
enum Operation {
    Summarize,
    TimestampedSummary,
    EnhancedTranscript,
    TopComments,
}

impl Operation {
    fn as_str(&self) -> &'static str {
        match self {
            Operation::Summarize => "summarize",
            Operation::TimestampedSummary => "timestamped-summary",
            Operation::EnhancedTranscript => "enhanced-transcript",
            Operation::TopComments => "top-comments",
        }
    }
}

struct Admission {
    video_id: VideoId,
    lang: Language,
    cache_key: String,
}

/// Validation then rate limiting, in that order: a malformed request is a 400
/// even when the client is over its quota.
async fn admit(
    state: &AppState,
    client_ip: IpAddr,
    body: &Value,
    op: Operation,
) -> Result<Admission, AppError> {
    let raw_id = body
        .get("videoId")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::BadRequest("videoId est requis".to_string()))?;
    let video_id = VideoId::parse(raw_id)
        .ok_or_else(|| AppError::BadRequest("Format d'ID vidéo YouTube invalide".to_string()))?;

    let lang = match body.get("targetLang").and_then(Value::as_str) {
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Langue non supportée: {raw}")))?,
        None => Language::default(),
    };

    if !state
        .rate_limiter
        .check_and_record(&client_ip.to_string())
        .await
    {
        info!(client = %client_ip, op = op.as_str(), "rate limited");
        return Err(AppError::RateLimited);
    }

    Ok(Admission {
        cache_key: format!("{}:{}:{}", op.as_str(), video_id, lang),
        video_id,
        lang,
    })
}

/// Runs an upstream call under the configured timeout.
async fn bounded<T, E, F>(fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, E>>,
    AppError: From<E>,
{
    match tokio::time::timeout(Duration::from_secs(upstream::TIMEOUT_SECONDS), fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(AppError::from(e)),
        Err(_) => Err(AppError::UpstreamTimeout),
    }
}

async fn fetch_transcript(state: &AppState, adm: &Admission) -> Result<Transcript, AppError> {
    bounded(state.transcripts.fetch(&adm.video_id, adm.lang)).await
}

fn parse_model_json(raw: &str) -> Result<Value, AppError> {
    serde_json::from_str(raw)
        .map_err(|_| AppError::Upstream("le modèle a renvoyé un JSON invalide".to_string()))
}

pub async fn summarize(
    State(state): State<Arc<AppState>>,
    ClientIp(client_ip): ClientIp,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body
        .map_err(|_| AppError::BadRequest("Corps de requête JSON requis".to_string()))?;
    let adm = admit(&state, client_ip, &body, Operation::Summarize).await?;
    if let Some(hit) = state.cache.get(&adm.cache_key).await {
        info!(key = %adm.cache_key, "cache HIT");
        return Ok(Json(hit));
    }

    let transcript = fetch_transcript(&state, &adm).await?;
    let text = transcript.bounded_text();
    let summary = bounded(state.model.complete(
        prompts::SUMMARY_SYSTEM,
        &prompts::summary_prompt(&text, adm.lang),
        false,
    ))
    .await?;

    let payload = json!({
        "summary": summary,
        "metadata": {
            "videoId": adm.video_id.as_str(),
            "language": adm.lang.as_str(),
            "charCount": text.chars().count(),
        }
    });
    state.cache.put(adm.cache_key, payload.clone()).await;
    Ok(Json(payload))
}

pub async fn timestamped_summary(
    State(state): State<Arc<AppState>>,
    ClientIp(client_ip): ClientIp,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body
        .map_err(|_| AppError::BadRequest("Corps de requête JSON requis".to_string()))?;
    let adm = admit(&state, client_ip, &body, Operation::TimestampedSummary).await?;
    if let Some(hit) = state.cache.get(&adm.cache_key).await {
        info!(key = %adm.cache_key, "cache HIT");
        return Ok(Json(hit));
    }

    let transcript = fetch_transcript(&state, &adm).await?;
    let text = transcript.bounded_text();
    let raw = bounded(state.model.complete(
        prompts::KEY_MOMENTS_SYSTEM,
        &prompts::key_moments_prompt(&text, adm.lang),
        true,
    ))
    .await?;
    let analysis = parse_model_json(&raw)?;

    let timestamps: Vec<Value> = transcript
        .snippets
        .iter()
        .map(|s| {
            json!({
                "time": s.start,
                "text": s.text,
                "duration": s.duration,
            })
        })
        .collect();
    let moments_count = timestamps.len();

    let payload = json!({
        "analysis": analysis,
        "timestamps": timestamps,
        "metadata": {
            "videoId": adm.video_id.as_str(),
            "language": adm.lang.as_str(),
            "momentsCount": moments_count,
        }
    });
    state.cache.put(adm.cache_key, payload.clone()).await;
    Ok(Json(payload))
}

pub async fn enhanced_transcript(
    State(state): State<Arc<AppState>>,
    ClientIp(client_ip): ClientIp,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body
        .map_err(|_| AppError::BadRequest("Corps de requête JSON requis".to_string()))?;
    let adm = admit(&state, client_ip, &body, Operation::EnhancedTranscript).await?;
    if let Some(hit) = state.cache.get(&adm.cache_key).await {
        info!(key = %adm.cache_key, "cache HIT");
        return Ok(Json(hit));
    }

    let transcript = fetch_transcript(&state, &adm).await?;
    let text = transcript.bounded_text();
    let raw = bounded(state.model.complete(
        prompts::ENHANCE_SYSTEM,
        &prompts::enhance_prompt(&text, adm.lang),
        true,
    ))
    .await?;
    let result = parse_model_json(&raw)?;

    let payload = json!({
        "result": result,
        "metadata": {
            "videoId": adm.video_id.as_str(),
            "language": adm.lang.as_str(),
            "originalLength": text.chars().count(),
        }
    });
    state.cache.put(adm.cache_key, payload.clone()).await;
    Ok(Json(payload))
}

pub async fn top_comments(
    State(state): State<Arc<AppState>>,
    ClientIp(client_ip): ClientIp,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body
        .map_err(|_| AppError::BadRequest("Corps de requête JSON requis".to_string()))?;
    let adm = admit(&state, client_ip, &body, Operation::TopComments).await?;
    if let Some(hit) = state.cache.get(&adm.cache_key).await {
        info!(key = %adm.cache_key, "cache HIT");
        return Ok(Json(hit));
    }

    let transcript = fetch_transcript(&state, &adm).await?;
    let text = transcript.bounded_text();
    let raw = bounded(state.model.complete(
        prompts::COMMENTS_SYSTEM,
        &prompts::comments_prompt(&text, adm.lang),
        true,
    ))
    .await?;
    let result = parse_model_json(&raw)?;

    let payload = json!({
        "result": result,
        "metadata": {
            "videoId": adm.video_id.as_str(),
            "language": adm.lang.as_str(),
            "generatedAt": Utc::now().to_rfc3339(),
        }
    });
    state.cache.put(adm.cache_key, payload.clone()).await;
    Ok(Json(payload))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Liveness endpoint. No validation, caching, or rate limiting.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    })
}
