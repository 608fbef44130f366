// Application-wide constants

/// Transcript cache configuration
pub mod cache {
    pub const MAX_CAPACITY: usize = 100;
    pub const TTL_SECONDS: u64 = 3600; // 1 hour
}

/// Rate limiter configuration
pub mod rate_limiter {
    pub const MINUTE_CAP: u64 = 10;
    pub const MINUTE_WINDOW_SECONDS: u64 = 60;
    pub const DAY_CAP: u64 = 100;
    pub const DAY_WINDOW_SECONDS: u64 = 86_400;
    /// Clients idle for a full day window are dropped by the cleanup task
    pub const IDLE_TTL_SECONDS: u64 = DAY_WINDOW_SECONDS;
}

/// Transcript handling
pub mod transcript {
    pub const MAX_CHARS: usize = 12_000;
    pub const TRUNCATION_NOTICE: &str = "\n\n[Tronqué à cause de la taille maximale]";
}

/// Upstream collaborators (transcript provider, LLM)
pub mod upstream {
    pub const TIMEOUT_SECONDS: u64 = 30;
}

/// Monitoring configuration
pub mod monitoring {
    pub const METRICS_INTERVAL_SECONDS: u64 = 60; // 1 minute
}

/// Default configuration values
pub mod defaults {
    pub const PORT: u16 = 5000;
    pub const OPENAI_MODEL: &str = "gpt-4-turbo";
}
