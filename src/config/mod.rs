//! Engine configuration (explicit, dependency-injected — no globals).

use std::time::Duration;

use crate::error::{Result, ZorvaError};

/// Default OpenAI-compatible base URL for the assistant-run backend.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the run-orchestration engine.
///
/// Constructed once at startup and passed into the engine; every remote
/// client and timing knob flows from here rather than from module globals.
#[derive(Debug, Clone)]
pub struct ZorvaConfig {
    /// API key for the remote assistant-run backend.
    pub api_key: String,
    /// Assistant identifier runs are created against.
    pub assistant_id: String,
    /// Base URL of the remote backend.
    pub base_url: String,
    /// Delay between run-status polls while driving a run.
    pub poll_interval: Duration,
    /// Delay between status polls while confirming a cancellation.
    pub reconcile_poll_interval: Duration,
    /// Ceiling on how long reconciliation waits for one stale run to die.
    pub reconcile_ceiling: Duration,
    /// Delay inserted between streamed tokens (typing effect).
    pub token_delay: Duration,
    /// Wall-clock ceiling on a whole run; `None` disables the guard.
    pub run_timeout: Option<Duration>,
}

impl ZorvaConfig {
    /// Create a config with the given credentials and default timings.
    pub fn new(api_key: impl Into<String>, assistant_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            assistant_id: assistant_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: Duration::from_millis(800),
            reconcile_poll_interval: Duration::from_millis(500),
            reconcile_ceiling: Duration::from_secs(10),
            token_delay: Duration::from_millis(5),
            run_timeout: Some(Duration::from_secs(120)),
        }
    }

    /// Load credentials from `OPENAI_API_KEY` and `OPENAI_ASSISTANT_ID`.
    ///
    /// Reads `.env` first if present (ignored when absent).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ZorvaError::Configuration("OPENAI_API_KEY not set".into()))?;
        let assistant_id = std::env::var("OPENAI_ASSISTANT_ID")
            .map_err(|_| ZorvaError::Configuration("OPENAI_ASSISTANT_ID not set".into()))?;
        let mut config = Self::new(api_key, assistant_id);
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            config.base_url = url;
        }
        Ok(config)
    }

    /// Override the backend base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the run-status poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Override the per-token streaming delay.
    pub fn with_token_delay(mut self, delay: Duration) -> Self {
        self.token_delay = delay;
        self
    }

    /// Override or disable the run wall-clock timeout.
    pub fn with_run_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.run_timeout = timeout;
        self
    }

    /// Override the reconciliation ceiling.
    pub fn with_reconcile_ceiling(mut self, ceiling: Duration) -> Self {
        self.reconcile_ceiling = ceiling;
        self
    }
}
