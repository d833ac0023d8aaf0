pub mod app_config;
pub mod config;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, AzureConfig, PlayStoreConfig, TranslateConfig, TwitterConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{AnnotatedRecord, RawRecord, ResultTable, SentimentLabel, SourceKind};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
