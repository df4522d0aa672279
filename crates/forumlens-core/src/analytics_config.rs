//! Tunable weights and thresholds for the analytics engines.
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields the stock policy. Engines receive these values explicitly; nothing
//! reads them from global state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::records::Granularity;
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyticsConfig {
    pub granularity: Granularity,
    pub sentiment: SentimentThresholds,
    pub engagement: EngagementWeights,
    pub trending: TrendingPolicy,
    pub category_scoring: CategoryScoring,
    pub bands: RecommendationBands,
    pub acquisition: AcquisitionPolicy,
    pub keywords: KeywordPolicy,
}

/// Polarity cut-offs for label derivation. Both comparisons are strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SentimentThresholds {
    pub positive: f64,
    pub negative: f64,
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            positive: 0.1,
            negative: -0.1,
        }
    }
}

/// `engagement = replies * reply + views * view`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngagementWeights {
    pub reply: f64,
    pub view: f64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            reply: 3.0,
            view: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrendingPolicy {
    pub window_days: u32,
    pub top_n: usize,
    /// Items with `mention_count <= min_mentions` are not trending.
    pub min_mentions: usize,
    /// Phrases the title heuristic must never report.
    pub title_stoplist: Vec<String>,
    /// Candidate titles shorter than this many characters are discarded.
    pub min_title_len: usize,
}

impl Default for TrendingPolicy {
    fn default() -> Self {
        Self {
            window_days: 30,
            top_n: 10,
            min_mentions: 1,
            title_stoplist: ["I think", "I feel", "I believe", "In my opinion"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            min_title_len: 4,
        }
    }
}

/// Weights of the category engagement score. Each term is normalized by the
/// batch maximum, so scores only compare categories within one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryScoring {
    pub post_weight: f64,
    pub reply_weight: f64,
    pub sentiment_weight: f64,
    /// How many categories the inventory plan lists as high performing.
    pub top_categories: usize,
}

impl Default for CategoryScoring {
    fn default() -> Self {
        Self {
            post_weight: 0.4,
            reply_weight: 0.4,
            sentiment_weight: 0.2,
            top_categories: 3,
        }
    }
}

/// Ordered recommendation bands; the first matching band wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecommendationBands {
    pub high_score: f64,
    pub expand_sentiment: f64,
    pub improve_sentiment: f64,
    pub maintain_score: f64,
    pub selective_score: f64,
}

impl Default for RecommendationBands {
    fn default() -> Self {
        Self {
            high_score: 0.7,
            expand_sentiment: 0.2,
            improve_sentiment: 0.0,
            maintain_score: 0.5,
            selective_score: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AcquisitionPolicy {
    pub min_polarity: f64,
    pub min_topics: usize,
    pub min_mentions: usize,
    pub polarity_weight: f64,
    pub topics_weight: f64,
    pub mentions_weight: f64,
    pub max_recommendations: usize,
}

impl Default for AcquisitionPolicy {
    fn default() -> Self {
        Self {
            min_polarity: 0.2,
            min_topics: 1,
            min_mentions: 2,
            polarity_weight: 0.4,
            topics_weight: 0.3,
            mentions_weight: 0.3,
            max_recommendations: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeywordPolicy {
    /// Forum-wide keyword count in `top_keywords.json`.
    pub top_n: usize,
    /// Keywords listed for each top category in the markdown report.
    pub per_category: usize,
}

impl Default for KeywordPolicy {
    fn default() -> Self {
        Self {
            top_n: 30,
            per_category: 5,
        }
    }
}

impl AnalyticsConfig {
    /// Reject configurations that would feed NaN or nonsense into a score.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("engagement.reply", self.engagement.reply),
            ("engagement.view", self.engagement.view),
            ("category_scoring.post_weight", self.category_scoring.post_weight),
            ("category_scoring.reply_weight", self.category_scoring.reply_weight),
            (
                "category_scoring.sentiment_weight",
                self.category_scoring.sentiment_weight,
            ),
            ("acquisition.polarity_weight", self.acquisition.polarity_weight),
            ("acquisition.topics_weight", self.acquisition.topics_weight),
            ("acquisition.mentions_weight", self.acquisition.mentions_weight),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{field} must be a finite, non-negative number (got {value})"
                )));
            }
        }

        let thresholds = [
            ("sentiment.positive", self.sentiment.positive),
            ("sentiment.negative", self.sentiment.negative),
            ("bands.high_score", self.bands.high_score),
            ("bands.expand_sentiment", self.bands.expand_sentiment),
            ("bands.improve_sentiment", self.bands.improve_sentiment),
            ("bands.maintain_score", self.bands.maintain_score),
            ("bands.selective_score", self.bands.selective_score),
            ("acquisition.min_polarity", self.acquisition.min_polarity),
        ];
        for (field, value) in thresholds {
            if !value.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "{field} must be finite (got {value})"
                )));
            }
        }

        if self.sentiment.negative > self.sentiment.positive {
            return Err(ConfigError::Validation(format!(
                "sentiment.negative ({}) must not exceed sentiment.positive ({})",
                self.sentiment.negative, self.sentiment.positive
            )));
        }
        if self.trending.top_n == 0 {
            return Err(ConfigError::Validation(
                "trending.top_n must be at least 1".to_string(),
            ));
        }
        if self.trending.window_days == 0 {
            return Err(ConfigError::Validation(
                "trending.window_days must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Load and validate analytics tuning from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_analytics_config(path: &Path) -> Result<AnalyticsConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::AnalyticsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    // An empty document deserializes to unit, not to a map.
    let config: AnalyticsConfig = if content.trim().is_empty() {
        AnalyticsConfig::default()
    } else {
        serde_yaml::from_str(&content)?
    };

    config.validate()?;

    Ok(config)
}
