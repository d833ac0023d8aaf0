use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};

use crate::app_config::{AppConfig, AzureConfig, PlayStoreConfig, TranslateConfig, TwitterConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or the Azure settings are incomplete.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or the Azure settings are incomplete.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for unparseable values or partial
/// Azure settings.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let window_start = {
        let var = "ANTERAJA_TWITTER_WINDOW_START";
        DateTime::parse_from_rfc3339(&or_default(var, "2021-10-10T23:15:00Z"))
            .map_err(|e| invalid(var, e.to_string()))?
            .with_timezone(&Utc)
    };

    let twitter = TwitterConfig {
        bearer_token: optional("ANTERAJA_TWITTER_BEARER_TOKEN"),
        base_url: or_default("ANTERAJA_TWITTER_BASE_URL", "https://api.twitter.com"),
        query: or_default(
            "ANTERAJA_TWITTER_QUERY",
            "anteraja -from:anteraja_id lang:id",
        ),
        window_start,
        window_days: parse_u32("ANTERAJA_TWITTER_WINDOW_DAYS", "8")?,
        per_window: parse_usize("ANTERAJA_TWITTER_PER_WINDOW", "100")?,
    };

    let cutoff = match optional("ANTERAJA_PLAY_CUTOFF") {
        // An explicitly empty value disables the cutoff.
        None if lookup("ANTERAJA_PLAY_CUTOFF").is_ok() => None,
        None => Some(parse_cutoff("2021-11-11")?),
        Some(raw) => Some(parse_cutoff(&raw)?),
    };

    let play_store = PlayStoreConfig {
        app_id: or_default("ANTERAJA_PLAY_APP_ID", "id.anteraja.aca"),
        base_url: or_default("ANTERAJA_PLAY_BASE_URL", "https://play.google.com"),
        lang: or_default("ANTERAJA_PLAY_LANG", "en"),
        country: or_default("ANTERAJA_PLAY_COUNTRY", "id"),
        cutoff,
    };

    let translate = TranslateConfig {
        url: or_default(
            "ANTERAJA_TRANSLATE_URL",
            "https://translate.googleapis.com/translate_a/single",
        ),
        source_lang: or_default("ANTERAJA_SOURCE_LANG", "id"),
        target_lang: or_default("ANTERAJA_TARGET_LANG", "en"),
        delay_ms: parse_u64("ANTERAJA_TRANSLATE_DELAY_MS", "0")?,
    };

    let azure = match (
        optional("ANTERAJA_AZURE_ACCOUNT"),
        optional("ANTERAJA_AZURE_KEY"),
        optional("ANTERAJA_AZURE_CONTAINER"),
    ) {
        (Some(account), Some(key), Some(container)) => {
            let base_url = optional("ANTERAJA_AZURE_BASE_URL")
                .unwrap_or_else(|| format!("https://{account}.blob.core.windows.net"));
            Some(AzureConfig {
                account,
                key,
                container,
                base_url,
            })
        }
        (None, None, None) => None,
        (account, key, container) => {
            let missing: Vec<&str> = [
                ("ANTERAJA_AZURE_ACCOUNT", account.is_none()),
                ("ANTERAJA_AZURE_KEY", key.is_none()),
                ("ANTERAJA_AZURE_CONTAINER", container.is_none()),
            ]
            .into_iter()
            .filter_map(|(var, absent)| absent.then_some(var))
            .collect();
            return Err(invalid(
                "ANTERAJA_AZURE_*",
                format!("incomplete Azure settings, missing: {}", missing.join(", ")),
            ));
        }
    };

    Ok(AppConfig {
        log_level: or_default("ANTERAJA_LOG_LEVEL", "info"),
        twitter,
        play_store,
        translate,
        azure,
        dictionary_path: optional("ANTERAJA_DICTIONARY_PATH").map(PathBuf::from),
        output_dir: PathBuf::from(or_default("ANTERAJA_OUTPUT_DIR", "./output")),
        request_timeout_secs: parse_u64("ANTERAJA_REQUEST_TIMEOUT_SECS", "30")?,
        user_agent: or_default("ANTERAJA_USER_AGENT", "anteraja-etl/0.1 (sentiment)"),
        max_retries: parse_u32("ANTERAJA_MAX_RETRIES", "3")?,
        retry_backoff_base_secs: parse_u64("ANTERAJA_RETRY_BACKOFF_BASE_SECS", "5")?,
    })
}

/// Parse a `YYYY-MM-DD` cutoff into UTC midnight of that day.
fn parse_cutoff(raw: &str) -> Result<DateTime<Utc>, ConfigError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN).and_utc())
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "ANTERAJA_PLAY_CUTOFF".to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
