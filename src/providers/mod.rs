//! External collaborators, behind narrow traits so handlers can be
//! exercised with stand-ins.
//!
//! - `youtube` - transcript retrieval
//! - `openai` - chat-completion model calls

pub mod openai;
pub mod youtube;

use async_trait::async_trait;

use crate::constants::transcript as transcript_constants;
use crate::validate::{Language, VideoId};

/// One timed line of a transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// A fetched video transcript.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub snippets: Vec<Snippet>,
}

impl Transcript {
    /// Full transcript text, bounded to the configured maximum. Overlong
    /// transcripts are truncated (on a character boundary) and marked, then
    /// processing proceeds.
    pub fn bounded_text(&self) -> String {
        let joined = self
            .snippets
            .iter()
            .map(|s| s.text.trim())
            .collect::<Vec<_>>()
            .join(" ");
        truncate_text(&joined, transcript_constants::MAX_CHARS)
    }
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str(transcript_constants::TRUNCATION_NOTICE);
    truncated
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No subtitles available in the requested languages.
    #[error("no transcript found for languages ({0})")]
    NotFound(String),
    /// The uploader disabled transcription for this video.
    #[error("transcripts are disabled for this video")]
    Disabled,
    #[error("transcript provider error: {0}")]
    Upstream(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("model returned no content")]
    EmptyResponse,
    #[error("model call failed: {0}")]
    Api(String),
}

#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    async fn fetch(&self, video_id: &VideoId, lang: Language) -> Result<Transcript, ProviderError>;
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Runs one system+user exchange and returns the model text. With
    /// `json_output` the model is constrained to emit a JSON object.
    async fn complete(
        &self,
        system: &str,
        user: &str,
        json_output: bool,
    ) -> Result<String, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_text("bonjour", 12_000), "bonjour");
    }

    #[test]
    fn overlong_text_is_truncated_and_marked() {
        let text = "a".repeat(13_000);
        let bounded = truncate_text(&text, 12_000);
        assert!(bounded.starts_with(&"a".repeat(12_000)));
        assert!(bounded.ends_with(transcript_constants::TRUNCATION_NOTICE));
        assert!(!bounded.contains(&"a".repeat(12_001)));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "é".repeat(5);
        let bounded = truncate_text(&text, 3);
        assert!(bounded.starts_with("ééé"));
    }

    #[test]
    fn bounded_text_joins_snippets_with_spaces() {
        let transcript = Transcript {
            snippets: vec![
                Snippet {
                    text: "first line ".into(),
                    start: 0.0,
                    duration: 1.5,
                },
                Snippet {
                    text: "second line".into(),
                    start: 1.5,
                    duration: 2.0,
                },
            ],
        };
        assert_eq!(transcript.bounded_text(), "first line second line");
    }
}
