//! Azure Blob Storage upload with Shared Key authorization.
//!
//! Only Put Blob is needed: each export replaces its blob wholesale.

use std::time::Duration;

use anteraja_core::AzureConfig;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;

use crate::error::StorageError;

type HmacSha256 = Hmac<Sha256>;

const API_VERSION: &str = "2019-12-12";
const BLOB_TYPE: &str = "BlockBlob";
const CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Block-blob writer for one storage account.
pub struct BlobClient {
    client: Client,
    account: String,
    key: Vec<u8>,
    base_url: String,
}

impl std::fmt::Debug for BlobClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobClient")
            .field("account", &self.account)
            .field("key", &"[redacted]")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl BlobClient {
    /// # Errors
    ///
    /// - [`StorageError::InvalidKey`] if the account key is not valid base64.
    /// - [`StorageError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        config: &AzureConfig,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, StorageError> {
        let key = STANDARD
            .decode(config.key.trim())
            .map_err(|e| StorageError::InvalidKey(e.to_string()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            account: config.account.clone(),
            key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create or overwrite `container/blob` with `body`.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Http`] on network failure.
    /// - [`StorageError::UnexpectedStatus`] with the service's error body on any non-2xx.
    pub async fn upload(
        &self,
        container: &str,
        blob: &str,
        body: String,
    ) -> Result<(), StorageError> {
        let url = format!("{}/{container}/{blob}", self.base_url);
        let date = http_date(Utc::now());
        let bytes = body.len();

        let canonical_headers = [
            ("x-ms-blob-type", BLOB_TYPE),
            ("x-ms-date", date.as_str()),
            ("x-ms-version", API_VERSION),
        ];
        let to_sign = string_to_sign(
            "PUT",
            bytes,
            CONTENT_TYPE,
            &canonical_headers,
            &format!("/{}/{container}/{blob}", self.account),
        );
        let authorization = format!("SharedKey {}:{}", self.account, sign(&self.key, &to_sign)?);

        let response = self
            .client
            .put(&url)
            .header("x-ms-blob-type", BLOB_TYPE)
            .header("x-ms-date", &date)
            .header("x-ms-version", API_VERSION)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::UnexpectedStatus {
                status: status.as_u16(),
                url,
                body,
            });
        }

        tracing::info!(container, blob, bytes, "uploaded blob");
        Ok(())
    }
}

/// RFC 1123 date as required by `x-ms-date`.
pub(crate) fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Shared Key string-to-sign for a request without conditional headers.
///
/// `x_ms_headers` must already be sorted by name; `Content-Length` is blank
/// when zero.
pub(crate) fn string_to_sign(
    verb: &str,
    content_length: usize,
    content_type: &str,
    x_ms_headers: &[(&str, &str)],
    canonical_resource: &str,
) -> String {
    let content_length = if content_length == 0 {
        String::new()
    } else {
        content_length.to_string()
    };
    let mut out = [
        verb,
        "", // Content-Encoding
        "", // Content-Language
        content_length.as_str(),
        "", // Content-MD5
        content_type,
        "", // Date
        "", // If-Modified-Since
        "", // If-Match
        "", // If-None-Match
        "", // If-Unmodified-Since
        "", // Range
    ]
    .join("\n");
    out.push('\n');
    for (name, value) in x_ms_headers {
        out.push_str(name);
        out.push(':');
        out.push_str(value);
        out.push('\n');
    }
    out.push_str(canonical_resource);
    out
}

/// Base64 HMAC-SHA256 of `message` under the decoded account key.
pub(crate) fn sign(key: &[u8], message: &str) -> Result<String, StorageError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| StorageError::InvalidKey(e.to_string()))?;
    mac.update(message.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
