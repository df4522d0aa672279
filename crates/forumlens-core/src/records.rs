//! Typed forum records consumed by every pipeline stage.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics_config::SentimentThresholds;
use crate::ConfigError;

pub type TopicId = i64;
pub type CategoryId = i64;

/// A forum topic (the opening post) or one of its replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// `t<topic id>` for topics, `r<reply id>` for replies.
    pub id: String,
    pub topic_id: TopicId,
    pub author: String,
    pub content: String,
    /// `None` when the export's date string could not be interpreted.
    pub created_at: Option<DateTime<Utc>>,
    pub is_topic: bool,
    pub category_id: CategoryId,
    /// Topic title. Replies carry `None`.
    pub title: Option<String>,
    /// View counter from the topic export. Replies carry `None`.
    pub view_count: Option<u64>,
}

impl Post {
    /// Text handed to the sentiment classifier: title and body for topics,
    /// body alone for replies.
    #[must_use]
    pub fn analysis_text(&self) -> String {
        match self.title.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(title) => format!("{title} {}", self.content),
            None => self.content.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Map a polarity onto a label using strict comparisons against the
    /// configured thresholds.
    #[must_use]
    pub fn from_polarity(polarity: f64, thresholds: &SentimentThresholds) -> Self {
        if polarity > thresholds.positive {
            SentimentLabel::Positive
        } else if polarity < thresholds.negative {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-post output of the external sentiment classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub post_id: String,
    pub polarity: f64,
    pub label: SentimentLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subjectivity: Option<f64>,
}

/// Calendar unit used to bucket time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    #[default]
    Week,
    Month,
}

impl Granularity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            other => Err(ConfigError::Validation(format!(
                "unknown granularity '{other}'; expected day, week, or month"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: Option<&str>, content: &str) -> Post {
        Post {
            id: "t1".to_string(),
            topic_id: 1,
            author: "dvdfan".to_string(),
            content: content.to_string(),
            created_at: None,
            is_topic: title.is_some(),
            category_id: 1,
            title: title.map(ToString::to_string),
            view_count: None,
        }
    }

    #[test]
    fn label_thresholds_are_strict() {
        let t = SentimentThresholds::default();
        assert_eq!(SentimentLabel::from_polarity(0.1, &t), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(0.11, &t), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_polarity(-0.1, &t), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(-0.5, &t), SentimentLabel::Negative);
    }

    #[test]
    fn label_uses_custom_thresholds() {
        let t = SentimentThresholds {
            positive: 0.5,
            negative: -0.5,
        };
        assert_eq!(SentimentLabel::from_polarity(0.3, &t), SentimentLabel::Neutral);
    }

    #[test]
    fn analysis_text_prefixes_title_for_topics() {
        assert_eq!(
            post(Some("Best Criterion releases"), "Share yours").analysis_text(),
            "Best Criterion releases Share yours"
        );
        assert_eq!(post(None, "Agreed").analysis_text(), "Agreed");
    }

    #[test]
    fn granularity_parses_aliases() {
        assert_eq!("Weekly".parse::<Granularity>().unwrap(), Granularity::Week);
        assert_eq!("day".parse::<Granularity>().unwrap(), Granularity::Day);
        assert!("fortnight".parse::<Granularity>().is_err());
    }

    #[test]
    fn sentiment_score_omits_missing_subjectivity() {
        let score = SentimentScore {
            post_id: "r2".to_string(),
            polarity: 0.25,
            label: SentimentLabel::Positive,
            subjectivity: None,
        };
        let json = serde_json::to_string(&score).unwrap();
        assert_eq!(json, r#"{"post_id":"r2","polarity":0.25,"label":"positive"}"#);
    }
}
