use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Twitter API v2 search settings.
#[derive(Clone)]
pub struct TwitterConfig {
    pub bearer_token: Option<String>,
    pub base_url: String,
    pub query: String,
    pub window_start: DateTime<Utc>,
    pub window_days: u32,
    pub per_window: usize,
}

impl std::fmt::Debug for TwitterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterConfig")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .field("base_url", &self.base_url)
            .field("query", &self.query)
            .field("window_start", &self.window_start)
            .field("window_days", &self.window_days)
            .field("per_window", &self.per_window)
            .finish()
    }
}

/// Google Play review feed settings.
#[derive(Debug, Clone)]
pub struct PlayStoreConfig {
    pub app_id: String,
    pub base_url: String,
    pub lang: String,
    pub country: String,
    /// Reviews older than this are discarded before translation.
    pub cutoff: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct TranslateConfig {
    pub url: String,
    pub source_lang: String,
    pub target_lang: String,
    pub delay_ms: u64,
}

/// Blob storage target. Present only when account, key and container are all set.
#[derive(Clone)]
pub struct AzureConfig {
    pub account: String,
    pub key: String,
    pub container: String,
    pub base_url: String,
}

impl std::fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureConfig")
            .field("account", &self.account)
            .field("key", &"[redacted]")
            .field("container", &self.container)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub twitter: TwitterConfig,
    pub play_store: PlayStoreConfig,
    pub translate: TranslateConfig,
    pub azure: Option<AzureConfig>,
    pub dictionary_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}
