use std::path::PathBuf;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Production writes machine-readable JSON log lines to stderr.
    #[must_use]
    pub fn json_logs(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Directory holding the forum JSON exports.
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Pre-computed sentiment scores. When unset the lexicon classifier runs.
    pub sentiment_path: Option<PathBuf>,
    pub analytics_config_path: Option<PathBuf>,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    /// Reference instant for relative dates and trend windows.
    pub as_of: Option<DateTime<Utc>>,
}

impl AppConfig {
    #[must_use]
    pub fn topics_path(&self) -> PathBuf {
        self.data_dir.join("forum-topics.json")
    }

    #[must_use]
    pub fn replies_path(&self) -> PathBuf {
        self.data_dir.join("forum-replies.json")
    }

    #[must_use]
    pub fn categories_path(&self) -> PathBuf {
        self.data_dir.join("forum-categories.json")
    }

    #[must_use]
    pub fn stats_path(&self) -> PathBuf {
        self.data_dir.join("forum-stats.json")
    }

    /// The configured reference instant, or the wall clock.
    #[must_use]
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.as_of.unwrap_or_else(Utc::now)
    }
}
