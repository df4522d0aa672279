//! Shared records and configuration for the forumlens analytics workspace.

pub mod analytics_config;
pub mod app_config;
pub mod config;
pub mod records;

use thiserror::Error;

pub use analytics_config::{
    load_analytics_config, AcquisitionPolicy, AnalyticsConfig, CategoryScoring,
    EngagementWeights, KeywordPolicy, RecommendationBands, SentimentThresholds, TrendingPolicy,
};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{Category, CategoryId, Granularity, Post, SentimentLabel, SentimentScore, TopicId};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read analytics config at {path}: {source}")]
    AnalyticsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse analytics config: {0}")]
    AnalyticsFileParse(#[from] serde_yaml::Error),

    #[error("analytics config validation failed: {0}")]
    Validation(String),
}
