//! Translation adapter.
//!
//! [`GoogleTranslator`] calls the public Google Translate web endpoint
//! (`translate_a/single?client=gtx`). Failures never propagate past
//! [`translate`]: a failed record yields `None` and the orchestrator drops it.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::error::SentimentError;

/// Longest input the provider accepts, in characters.
pub const MAX_INPUT_CHARS: usize = 5000;

/// Fixed source/target language codes for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// An external translation provider.
pub trait Translator {
    /// Translate one non-empty text.
    ///
    /// # Errors
    ///
    /// Provider-specific; any error drops the record.
    fn translate(
        &self,
        text: &str,
        languages: &LanguagePair,
    ) -> impl Future<Output = Result<String, SentimentError>> + Send;
}

/// Translate one text, turning every failure into `None`.
///
/// Empty or whitespace-only input is returned unchanged without calling the
/// provider. Input longer than [`MAX_INPUT_CHARS`] is unsupported.
pub async fn translate<T: Translator>(
    translator: &T,
    text: &str,
    languages: &LanguagePair,
) -> Option<String> {
    if text.trim().is_empty() {
        return Some(text.to_string());
    }

    let chars = text.chars().count();
    if chars > MAX_INPUT_CHARS {
        tracing::warn!(
            chars,
            limit = MAX_INPUT_CHARS,
            "text exceeds translation limit; dropping record"
        );
        return None;
    }

    match translator.translate(text, languages).await {
        Ok(translated) => Some(translated),
        Err(e) => {
            tracing::warn!(
                source_lang = %languages.source,
                target_lang = %languages.target,
                error = %e,
                "translation failed; dropping record"
            );
            None
        }
    }
}

/// Translate every text in order, one call at a time.
///
/// `delay_ms` is slept between provider calls (not before the first) to stay
/// under the provider's rate limit. The output has one entry per input.
pub async fn translate_batch<T: Translator>(
    translator: &T,
    texts: &[&str],
    languages: &LanguagePair,
    delay_ms: u64,
) -> Vec<Option<String>> {
    let mut out = Vec::with_capacity(texts.len());
    for (i, text) in texts.iter().enumerate() {
        if i > 0 && delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        out.push(translate(translator, text, languages).await);
    }

    let failed = out.iter().filter(|t| t.is_none()).count();
    tracing::info!(
        total = texts.len(),
        failed,
        "translation batch complete"
    );
    out
}

/// Google Translate web endpoint client.
pub struct GoogleTranslator {
    client: Client,
    url: String,
}

impl GoogleTranslator {
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SentimentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            url: url.to_owned(),
        })
    }
}

impl Translator for GoogleTranslator {
    fn translate(
        &self,
        text: &str,
        languages: &LanguagePair,
    ) -> impl Future<Output = Result<String, SentimentError>> + Send {
        async move {
            let response = self
                .client
                .get(&self.url)
                .query(&[
                    ("client", "gtx"),
                    ("sl", languages.source.as_str()),
                    ("tl", languages.target.as_str()),
                    ("dt", "t"),
                    ("q", text),
                ])
                .send()
                .await?;

            let status = response.status();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(SentimentError::RateLimited {
                    service: "google_translate".to_string(),
                    retry_after_secs: 0,
                });
            }
            if !status.is_success() {
                return Err(SentimentError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: self.url.clone(),
                });
            }

            let body = response.text().await?;
            let value: Value =
                serde_json::from_str(&body).map_err(|e| SentimentError::Deserialize {
                    context: "translate response".to_string(),
                    source: e,
                })?;
            parse_translation(&value)
        }
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The payload is `[[["<translated>", "<source text>", ...], ...], ...]`.
pub(crate) fn parse_translation(body: &Value) -> Result<String, SentimentError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| SentimentError::MalformedResponse {
            context: "translate response".to_string(),
            reason: "missing segment list".to_string(),
        })?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        return Err(SentimentError::Translation(
            "provider returned an empty translation".to_string(),
        ));
    }
    Ok(translated)
}
