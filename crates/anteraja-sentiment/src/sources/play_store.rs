//! Google Play review feed via the Play Store web UI `batchexecute` RPC.
//!
//! Reviews are requested newest-first, 199 per page. The response wraps a
//! JSON-encoded string inside an outer JSON envelope behind an anti-XSSI
//! prefix; [`parse_reviews_page`] unwraps both layers.

use anteraja_core::{PlayStoreConfig, RawRecord};
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde_json::{json, Value};

use super::build_http_client;
use crate::error::SentimentError;
use crate::rate_limit::retry_with_backoff;

const RPC_ID: &str = "UsvDTd";
const BATCH_PATH: &str = "/_/PlayStoreUi/data/batchexecute";
const SORT_NEWEST: u8 = 2;
const PAGE_SIZE: u32 = 199;
const XSSI_PREFIX: &str = ")]}'";

/// Maximum number of pages to fetch before returning an error.
/// Prevents infinite loops on cycling cursors.
const MAX_PAGES: usize = 200;

/// Client for one app's public review list.
pub struct PlayStoreClient {
    client: Client,
    config: PlayStoreConfig,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl PlayStoreClient {
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        config: &PlayStoreConfig,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, SentimentError> {
        Ok(Self {
            client: build_http_client(timeout_secs, user_agent)?,
            config: config.clone(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetch every review, newest first.
    ///
    /// With `stop_before` set, paging ends after the first page whose oldest
    /// review predates it. That page is returned whole; callers still filter.
    ///
    /// # Errors
    ///
    /// - [`SentimentError::PaginationLimit`] after [`MAX_PAGES`] pages.
    /// - Any page failure: HTTP errors, non-2xx statuses, malformed payloads.
    pub async fn fetch_all(
        &self,
        stop_before: Option<DateTime<Utc>>,
    ) -> Result<Vec<RawRecord>, SentimentError> {
        let mut records = Vec::new();
        let mut token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            if pages >= MAX_PAGES {
                return Err(SentimentError::PaginationLimit {
                    feed: format!("play_store:{}", self.config.app_id),
                    max_pages: MAX_PAGES,
                });
            }
            pages += 1;

            let (page, next) = self.fetch_page(token.as_deref()).await?;
            let reached_cutoff = match (stop_before, page.iter().map(|r| r.timestamp).min()) {
                (Some(cutoff), Some(oldest)) => oldest < cutoff,
                _ => false,
            };
            records.extend(page);

            if reached_cutoff {
                tracing::debug!(
                    source = "play_store",
                    pages,
                    "oldest review predates cutoff; stopping pagination"
                );
                break;
            }
            match next {
                Some(t) => token = Some(t),
                None => break,
            }
        }

        tracing::info!(
            source = "play_store",
            app_id = %self.config.app_id,
            pages,
            count = records.len(),
            "fetched reviews"
        );
        Ok(records)
    }

    /// Fetch one page of reviews and the continuation token, if any.
    ///
    /// # Errors
    ///
    /// See [`PlayStoreClient::fetch_all`].
    pub async fn fetch_page(
        &self,
        token: Option<&str>,
    ) -> Result<(Vec<RawRecord>, Option<String>), SentimentError> {
        let url = format!(
            "{}{BATCH_PATH}",
            self.config.base_url.trim_end_matches('/')
        );
        let query = [
            ("hl", self.config.lang.as_str()),
            ("gl", self.config.country.as_str()),
        ];
        let body = request_body(&self.config.app_id, token);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            let body = body.clone();
            async move {
                let response = self
                    .client
                    .post(&url)
                    .query(&query)
                    .header(
                        reqwest::header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded;charset=UTF-8",
                    )
                    .body(body)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(SentimentError::RateLimited {
                        service: "play_store".to_string(),
                        retry_after_secs,
                    });
                }

                if !status.is_success() {
                    return Err(SentimentError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let text = response.text().await?;
                parse_reviews_page(&text)
            }
        })
        .await
    }
}

/// Form-encoded `f.req` body for the review-list RPC.
pub(crate) fn request_body(app_id: &str, token: Option<&str>) -> String {
    let inner = json!([
        null,
        null,
        [2, SORT_NEWEST, [PAGE_SIZE, null, token], null, []],
        [app_id, 7]
    ]);
    let envelope = json!([[[RPC_ID, inner.to_string(), null, "generic"]]]);
    format!(
        "f.req={}",
        utf8_percent_encode(&envelope.to_string(), NON_ALPHANUMERIC)
    )
}

fn malformed(reason: impl Into<String>) -> SentimentError {
    SentimentError::MalformedResponse {
        context: "play store reviews".to_string(),
        reason: reason.into(),
    }
}

/// Parse a `batchexecute` response body into reviews and the next-page token.
///
/// A missing review list is an empty page. Reviews without a timestamp are
/// skipped.
///
/// # Errors
///
/// [`SentimentError::Deserialize`] when either JSON layer fails to parse,
/// [`SentimentError::MalformedResponse`] when the envelope lacks the payload.
pub(crate) fn parse_reviews_page(
    body: &str,
) -> Result<(Vec<RawRecord>, Option<String>), SentimentError> {
    let body = body.trim_start();
    let body = body.strip_prefix(XSSI_PREFIX).unwrap_or(body);

    let envelope: Value = serde_json::from_str(body).map_err(|e| SentimentError::Deserialize {
        context: "play store envelope".to_string(),
        source: e,
    })?;
    let payload = envelope
        .get(0)
        .and_then(|frame| frame.get(2))
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing payload at [0][2]"))?;
    let inner: Value = serde_json::from_str(payload).map_err(|e| SentimentError::Deserialize {
        context: "play store payload".to_string(),
        source: e,
    })?;

    let reviews = inner
        .get(0)
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(parse_review).collect())
        .unwrap_or_default();

    Ok((reviews, next_token(&inner)))
}

/// Token at `[-2][-1]` of the payload.
fn next_token(inner: &Value) -> Option<String> {
    let items = inner.as_array()?;
    let cursor = items.get(items.len().checked_sub(2)?)?.as_array()?;
    cursor.last()?.as_str().map(str::to_string)
}

fn parse_review(review: &Value) -> Option<RawRecord> {
    let Some(secs) = review
        .get(5)
        .and_then(|ts| ts.get(0))
        .and_then(Value::as_i64)
    else {
        let review_id = review.get(0).and_then(Value::as_str).unwrap_or_default();
        tracing::warn!(source = "play_store", review_id, "review has no timestamp; skipping");
        return None;
    };
    let timestamp = DateTime::<Utc>::from_timestamp(secs, 0)?;
    let user_name = review
        .get(1)
        .and_then(|user| user.get(0))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let content = review.get(4).and_then(Value::as_str).unwrap_or_default();
    Some(RawRecord::new(user_name, timestamp, content))
}
