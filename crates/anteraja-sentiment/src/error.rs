use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limited by {service} (retry after {retry_after_secs}s)")]
    RateLimited {
        service: String,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed response from {context}: {reason}")]
    MalformedResponse { context: String, reason: String },

    #[error("translation error: {0}")]
    Translation(String),

    #[error("pagination limit reached for {feed}: exceeded {max_pages} pages")]
    PaginationLimit { feed: String, max_pages: usize },

    #[error("missing credentials for {0}")]
    MissingCredentials(String),

    #[error("failed to read dictionary {path}: {source}")]
    Dictionary {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
