//! Twitter API v2 full-archive search.
//!
//! The search interval is split into one-day windows. Each window is paged via
//! `meta.next_token` until `per_window` tweets are collected or the window is
//! exhausted.

use std::collections::HashMap;

use anteraja_core::{RawRecord, TwitterConfig};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;

use super::build_http_client;
use crate::error::SentimentError;
use crate::rate_limit::retry_with_backoff;

const SEARCH_PATH: &str = "/2/tweets/search/all";
/// `max_results` bounds accepted by the full-archive endpoint.
const MIN_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 100;
/// Fallback wait when a 429 carries no usable reset header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Maximum number of pages fetched for one window.
/// Prevents infinite loops on token-only pages.
const MAX_PAGES: usize = 200;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub(crate) data: Vec<Tweet>,
    #[serde(default)]
    pub(crate) includes: Includes,
    #[serde(default)]
    pub(crate) meta: Meta,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Tweet {
    pub(crate) text: String,
    pub(crate) author_id: String,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Includes {
    #[serde(default)]
    pub(crate) users: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) username: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Meta {
    pub(crate) next_token: Option<String>,
}

/// Client for the Twitter v2 search endpoint, authenticated by bearer token.
pub struct TwitterClient {
    client: Client,
    bearer_token: String,
    config: TwitterConfig,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl TwitterClient {
    /// # Errors
    ///
    /// - [`SentimentError::MissingCredentials`] when no bearer token is configured.
    /// - [`SentimentError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        config: &TwitterConfig,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, SentimentError> {
        let bearer_token = config
            .bearer_token
            .clone()
            .ok_or_else(|| SentimentError::MissingCredentials("twitter".to_string()))?;
        Ok(Self {
            client: build_http_client(timeout_secs, user_agent)?,
            bearer_token,
            config: config.clone(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Collect up to `per_window` tweets for each configured one-day window.
    ///
    /// Records come back window by window, in the order the API returns them.
    ///
    /// # Errors
    ///
    /// Any window failure aborts the whole fetch: rate limits that outlast the
    /// retry budget, non-2xx responses and malformed JSON.
    pub async fn fetch_all(&self) -> Result<Vec<RawRecord>, SentimentError> {
        let mut records = Vec::new();
        for day in 0..self.config.window_days {
            let start = self.config.window_start + Duration::days(i64::from(day));
            let end = start + Duration::days(1);
            let window = self
                .fetch_window(start, end, self.config.per_window)
                .await?;
            tracing::debug!(
                source = "twitter",
                window_start = %start,
                count = window.len(),
                "fetched search window"
            );
            records.extend(window);
        }
        tracing::info!(source = "twitter", count = records.len(), "fetched tweets");
        Ok(records)
    }

    /// Collect at most `limit` tweets created in `[start, end)`.
    ///
    /// # Errors
    ///
    /// [`SentimentError::PaginationLimit`] after [`MAX_PAGES`] pages, otherwise
    /// see [`TwitterClient::fetch_all`].
    pub async fn fetch_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<RawRecord>, SentimentError> {
        let mut records: Vec<RawRecord> = Vec::new();
        let mut next_token: Option<String> = None;
        let mut pages = 0usize;

        while records.len() < limit {
            if pages >= MAX_PAGES {
                return Err(SentimentError::PaginationLimit {
                    feed: format!(
                        "twitter:{}",
                        start.to_rfc3339_opts(SecondsFormat::Secs, true)
                    ),
                    max_pages: MAX_PAGES,
                });
            }
            pages += 1;

            let page_size = (limit - records.len()).clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
            let page = self
                .fetch_page(start, end, page_size, next_token.as_deref())
                .await?;
            let token = page.meta.next_token.clone();
            records.extend(into_records(page));
            match token {
                Some(t) => next_token = Some(t),
                None => break,
            }
        }

        records.truncate(limit);
        Ok(records)
    }

    async fn fetch_page(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page_size: usize,
        next_token: Option<&str>,
    ) -> Result<SearchResponse, SentimentError> {
        let url = format!("{}{SEARCH_PATH}", self.config.base_url.trim_end_matches('/'));
        let mut params: Vec<(&str, String)> = vec![
            ("query", self.config.query.clone()),
            (
                "start_time",
                start.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            ("end_time", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ("max_results", page_size.to_string()),
            ("tweet.fields", "created_at,author_id".to_string()),
            ("expansions", "author_id".to_string()),
            ("user.fields", "username".to_string()),
        ];
        if let Some(token) = next_token {
            params.push(("next_token", token.to_string()));
        }

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            let params = params.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .bearer_auth(&self.bearer_token)
                    .query(&params)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let reset = response
                        .headers()
                        .get("x-rate-limit-reset")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<i64>().ok());
                    return Err(SentimentError::RateLimited {
                        service: "twitter".to_string(),
                        retry_after_secs: retry_after_from_reset(reset, Utc::now()),
                    });
                }

                if !status.is_success() {
                    return Err(SentimentError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<SearchResponse>(&body).map_err(|e| {
                    SentimentError::Deserialize {
                        context: "twitter search response".to_string(),
                        source: e,
                    }
                })
            }
        })
        .await
    }
}

/// Seconds until the epoch `reset` instant, at least one second.
pub(crate) fn retry_after_from_reset(reset: Option<i64>, now: DateTime<Utc>) -> u64 {
    match reset {
        Some(reset) => u64::try_from(reset - now.timestamp()).unwrap_or(0).max(1),
        None => DEFAULT_RETRY_AFTER_SECS,
    }
}

/// Join tweets to their authors' usernames.
///
/// A tweet whose author is missing from `includes.users` keeps the numeric
/// author id as its identifier.
pub(crate) fn into_records(page: SearchResponse) -> Vec<RawRecord> {
    let usernames: HashMap<String, String> = page
        .includes
        .users
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    page.data
        .into_iter()
        .map(|tweet| {
            let identifier = usernames
                .get(&tweet.author_id)
                .cloned()
                .unwrap_or(tweet.author_id);
            RawRecord::new(identifier, tweet.created_at, tweet.text)
        })
        .collect()
}
