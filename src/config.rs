use anyhow::Error;

use crate::constants::defaults;

/// Environment-backed configuration. Loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    /// Accepted for hosted transcript backends; the scraping client works without it.
    pub youtube_api_key: Option<String>,
    pub port: u16,
    pub model: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Error> {
        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY must be set in the environment or .env file"))?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid TCP port, got '{raw}'"))?,
            Err(_) => defaults::PORT,
        };

        Ok(Self {
            openai_api_key,
            youtube_api_key: std::env::var("YOUTUBE_API_KEY").ok(),
            port,
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| defaults::OPENAI_MODEL.to_string()),
        })
    }
}
