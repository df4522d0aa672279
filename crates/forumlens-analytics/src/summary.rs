//! Executive summary of one analytics run.

use serde::{Deserialize, Serialize};

use forumlens_ingest::ForumStats;

use crate::aggregate::OverallSentiment;
use crate::scoring::{AcquisitionRecommendation, CategoryRecommendation};
use crate::trending::TrendingItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_posts_analyzed: usize,
    pub scored_posts: usize,
    /// Mean polarity, two decimals.
    pub overall_sentiment: f64,
    /// One decimal.
    pub positive_posts_percentage: f64,
    pub trending_titles_identified: usize,
    pub acquisition_recommendations: usize,
    pub category_recommendations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCategory {
    pub category_name: String,
    pub engagement_score: f64,
    pub sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub overview: Overview,
    pub top_performing_categories: Vec<TopCategory>,
    pub key_insights: Vec<String>,
    /// Raw forum counters, when the export carried them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forum_stats: Option<ForumStats>,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Roll the run's tables up into headline numbers and insight sentences.
///
/// `categories` must already be ranked; the first `top_n` become the top
/// performers.
#[must_use]
pub fn build_executive_summary(
    overall: &OverallSentiment,
    categories: &[CategoryRecommendation],
    trending_titles: &[TrendingItem],
    acquisitions: &[AcquisitionRecommendation],
    top_n: usize,
    forum_stats: Option<ForumStats>,
) -> ExecutiveSummary {
    let top_performing_categories = categories
        .iter()
        .take(top_n)
        .map(|c| TopCategory {
            category_name: c.category_name.clone(),
            engagement_score: round_to(c.engagement_score, 2),
            sentiment: round_to(c.sentiment, 2),
        })
        .collect();

    let mut key_insights = Vec::new();
    if let Some(top) = categories.first() {
        key_insights.push(format!(
            "Customer engagement is highest in the {} category, suggesting potential for expanded inventory",
            top.category_name
        ));
    }
    // Ties keep the higher-ranked category.
    let most_positive = categories.iter().fold(None::<&CategoryRecommendation>, |best, c| match best {
        Some(b) if b.sentiment >= c.sentiment => Some(b),
        _ => Some(c),
    });
    if let Some(best) = most_positive {
        key_insights.push(format!(
            "Sentiment analysis reveals the strongest positive reception in the {} category",
            best.category_name
        ));
    }
    key_insights.push(format!(
        "Identified {} potential new title acquisitions based on positive forum discussions",
        acquisitions.len()
    ));

    ExecutiveSummary {
        overview: Overview {
            total_posts_analyzed: overall.total_posts,
            scored_posts: overall.scored_posts,
            overall_sentiment: round_to(overall.avg_polarity, 2),
            positive_posts_percentage: round_to(overall.pct_positive, 1),
            trending_titles_identified: trending_titles.len(),
            acquisition_recommendations: acquisitions.len(),
            category_recommendations: categories.len(),
        },
        top_performing_categories,
        key_insights,
        forum_stats,
    }
}

#[cfg(test)]
mod tests {
    use crate::scoring::RecommendationBand;

    use super::*;

    fn overall() -> OverallSentiment {
        OverallSentiment {
            total_posts: 12,
            scored_posts: 10,
            avg_polarity: 0.123_456,
            median_polarity: Some(0.1),
            std_polarity: None,
            avg_subjectivity: None,
            pct_positive: 41.666_666,
            pct_neutral: 33.333_334,
            pct_negative: 25.0,
        }
    }

    fn rec(name: &str, score: f64, sentiment: f64, rank: usize) -> CategoryRecommendation {
        let band = RecommendationBand::Maintain;
        CategoryRecommendation {
            category_name: name.to_string(),
            engagement_score: score,
            rank,
            sentiment,
            post_count: 1,
            replies_per_topic: 0.0,
            recommendation: band,
            inventory_action: band.inventory_action().to_string(),
            rationale: band.rationale().to_string(),
        }
    }

    #[test]
    fn overview_rounds_headline_numbers() {
        let summary = build_executive_summary(&overall(), &[], &[], &[], 3, None);
        assert!((summary.overview.overall_sentiment - 0.12).abs() < 1e-12);
        assert!((summary.overview.positive_posts_percentage - 41.7).abs() < 1e-12);
        assert!(summary.top_performing_categories.is_empty());
        assert_eq!(summary.key_insights.len(), 1);
    }

    #[test]
    fn insights_name_top_and_most_positive_categories() {
        let cats = vec![
            rec("Action", 0.9, 0.1, 1),
            rec("Horror", 0.6, 0.4, 2),
            rec("Drama", 0.4, 0.4, 3),
            rec("Musicals", 0.2, -0.1, 4),
        ];
        let summary = build_executive_summary(&overall(), &cats, &[], &[], 3, None);
        assert_eq!(summary.top_performing_categories.len(), 3);
        assert!(summary.key_insights[0].contains("Action"));
        assert!(summary.key_insights[1].contains("Horror"));
        assert!(summary.key_insights[2].starts_with("Identified 0"));
    }

    #[test]
    fn forum_stats_pass_through() {
        let stats: ForumStats = serde_json::from_str(r#"{"members": 120}"#).unwrap();
        let summary = build_executive_summary(&overall(), &[], &[], &[], 3, Some(stats.clone()));
        assert_eq!(summary.forum_stats, Some(stats));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["forum_stats"]["members"], 120);
    }
}
