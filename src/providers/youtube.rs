//! Transcript retrieval backed by `yt-transcript-rs`.

use async_trait::async_trait;
use tracing::warn;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

use super::{ProviderError, Snippet, Transcript, TranscriptProvider};
use crate::validate::{Language, VideoId};

pub struct YouTubeTranscripts {
    api: YouTubeTranscriptApi,
}

impl YouTubeTranscripts {
    pub fn new() -> Result<Self, anyhow::Error> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| anyhow::anyhow!("failed to build YouTube transcript client: {e}"))?;
        Ok(Self { api })
    }

    async fn fetch_in(&self, video_id: &VideoId, lang: &str) -> Result<Transcript, ProviderError> {
        match self
            .api
            .fetch_transcript(video_id.as_str(), &[lang], false)
            .await
        {
            Ok(fetched) => Ok(Transcript {
                snippets: fetched
                    .snippets
                    .into_iter()
                    .map(|s| Snippet {
                        text: s.text,
                        start: s.start,
                        duration: s.duration,
                    })
                    .collect(),
            }),
            Err(e) => Err(classify(e, lang)),
        }
    }
}

/// Maps the provider's typed failure onto the not-found / disabled / other
/// taxonomy.
fn classify(error: CouldNotRetrieveTranscript, lang: &str) -> ProviderError {
    match classify_reason(error.reason.as_ref(), lang) {
        Some(mapped) => mapped,
        None => ProviderError::Upstream(error.to_string()),
    }
}

/// Only uploader-disabled transcription and missing subtitles have dedicated
/// statuses; every other reason is an upstream failure.
fn classify_reason(
    reason: Option<&CouldNotRetrieveTranscriptReason>,
    lang: &str,
) -> Option<ProviderError> {
    match reason {
        Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled) => {
            Some(ProviderError::Disabled)
        }
        Some(CouldNotRetrieveTranscriptReason::NoTranscriptFound { .. }) => {
            Some(ProviderError::NotFound(lang.to_string()))
        }
        _ => None,
    }
}

/// Languages to try, in order. English subtitles are the most commonly
/// available, so they come first; the target language is the fallback, and is
/// never fetched twice.
fn language_preference(lang: Language) -> &'static [&'static str] {
    match lang {
        Language::En => &["en"],
        Language::Fr => &["en", "fr"],
    }
}

#[async_trait]
impl TranscriptProvider for YouTubeTranscripts {
    async fn fetch(&self, video_id: &VideoId, lang: Language) -> Result<Transcript, ProviderError> {
        let languages = language_preference(lang);
        for (attempt, candidate) in languages.iter().enumerate() {
            match self.fetch_in(video_id, candidate).await {
                Ok(transcript) => return Ok(transcript),
                Err(ProviderError::NotFound(_)) if attempt + 1 < languages.len() => {
                    warn!(video_id = %video_id, lang = %lang, "no {candidate} transcript, trying next language");
                }
                Err(other) => return Err(other),
            }
        }
        Err(ProviderError::NotFound(lang.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_reason_maps_to_forbidden() {
        assert!(matches!(
            classify_reason(
                Some(&CouldNotRetrieveTranscriptReason::TranscriptsDisabled),
                "fr"
            ),
            Some(ProviderError::Disabled)
        ));
    }

    #[test]
    fn unexplained_failures_are_upstream_errors() {
        assert!(classify_reason(None, "fr").is_none());
    }

    #[test]
    fn english_is_tried_before_the_target_language() {
        assert_eq!(language_preference(Language::Fr), ["en", "fr"]);
    }

    #[test]
    fn english_target_is_fetched_only_once() {
        assert_eq!(language_preference(Language::En), ["en"]);
    }
}
