//! Category engagement scores, recommendation bands and acquisition picks.
//!
//! Category scores normalize each term by the maximum over the current
//! batch, so a score only ranks categories within one run. Re-running with
//! a different snapshot rescales every score.

use std::fmt;

use serde::{Deserialize, Serialize};

use forumlens_core::{AcquisitionPolicy, AnalyticsConfig, CategoryScoring, RecommendationBands};

use crate::aggregate::CategorySummary;
use crate::stats::ratio;
use crate::trending::TrendingItem;

/// Inventory band for a category; bands are checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationBand {
    #[serde(rename = "EXPAND")]
    Expand,
    #[serde(rename = "IMPROVE")]
    Improve,
    #[serde(rename = "MAINTAIN")]
    Maintain,
    #[serde(rename = "SELECTIVE FOCUS")]
    SelectiveFocus,
    #[serde(rename = "REDUCE")]
    Reduce,
}

impl RecommendationBand {
    /// First matching band, using strict comparisons throughout.
    #[must_use]
    pub fn classify(score: f64, sentiment: f64, bands: &RecommendationBands) -> Self {
        if score > bands.high_score && sentiment > bands.expand_sentiment {
            Self::Expand
        } else if score > bands.high_score && sentiment < bands.improve_sentiment {
            Self::Improve
        } else if score > bands.maintain_score {
            Self::Maintain
        } else if score > bands.selective_score {
            Self::SelectiveFocus
        } else {
            Self::Reduce
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expand => "EXPAND",
            Self::Improve => "IMPROVE",
            Self::Maintain => "MAINTAIN",
            Self::SelectiveFocus => "SELECTIVE FOCUS",
            Self::Reduce => "REDUCE",
        }
    }

    #[must_use]
    pub fn inventory_action(self) -> &'static str {
        match self {
            Self::Expand => "Increase by 20-30%",
            Self::Improve => "Maintain but improve curation",
            Self::Maintain => "Maintain current levels",
            Self::SelectiveFocus => "Selective reduction, focus on high performers",
            Self::Reduce => "Reduce by 10-20%",
        }
    }

    #[must_use]
    pub fn rationale(self) -> &'static str {
        match self {
            Self::Expand => {
                "High engagement and positive sentiment indicate strong customer interest."
            }
            Self::Improve => {
                "High engagement but negative sentiment points at issues with the current selection."
            }
            Self::Maintain => "Good engagement indicates steady interest.",
            Self::SelectiveFocus => "Moderate engagement; focus on the popular sub-genres.",
            Self::Reduce => "Low engagement suggests limited customer interest.",
        }
    }
}

impl fmt::Display for RecommendationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecommendation {
    pub category_name: String,
    pub engagement_score: f64,
    /// 1-based position by descending score.
    pub rank: usize,
    /// Average polarity of the category.
    pub sentiment: f64,
    pub post_count: usize,
    pub replies_per_topic: f64,
    pub recommendation: RecommendationBand,
    pub inventory_action: String,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionRecommendation {
    pub title: String,
    pub mention_count: usize,
    pub distinct_topics: usize,
    pub avg_polarity: f64,
    pub acquisition_score: f64,
    /// 1-based position by descending score.
    pub rank: usize,
}

/// Score, rank and band every category with at least one topic.
///
/// Categories without topics are excluded (replies per topic is undefined).
/// When no category has replies the replies term contributes zero. Ties
/// keep their input order.
#[must_use]
pub fn score_categories(
    summaries: &[CategorySummary],
    scoring: &CategoryScoring,
    bands: &RecommendationBands,
) -> Vec<CategoryRecommendation> {
    let eligible: Vec<&CategorySummary> = summaries
        .iter()
        .filter(|s| {
            if s.topic_count == 0 {
                tracing::warn!(
                    category = %s.category_name,
                    "category has replies but no topics; excluded from scoring"
                );
                false
            } else {
                true
            }
        })
        .collect();

    let max_posts = eligible.iter().map(|s| s.post_count).max().unwrap_or(0);
    let replies_per_topic: Vec<f64> = eligible
        .iter()
        .map(|s| ratio(s.reply_count, s.topic_count))
        .collect();
    let max_rpt = replies_per_topic.iter().copied().fold(0.0_f64, f64::max);

    let mut scored: Vec<CategoryRecommendation> = eligible
        .iter()
        .zip(&replies_per_topic)
        .map(|(summary, &rpt)| {
            let posts_term = if max_posts > 0 {
                ratio(summary.post_count, max_posts)
            } else {
                0.0
            };
            let replies_term = if max_rpt > 0.0 { rpt / max_rpt } else { 0.0 };
            let sentiment_term = (summary.avg_polarity + 1.0) / 2.0;
            let score = scoring.post_weight * posts_term
                + scoring.reply_weight * replies_term
                + scoring.sentiment_weight * sentiment_term;

            let band = RecommendationBand::classify(score, summary.avg_polarity, bands);
            CategoryRecommendation {
                category_name: summary.category_name.clone(),
                engagement_score: score,
                rank: 0,
                sentiment: summary.avg_polarity,
                post_count: summary.post_count,
                replies_per_topic: rpt,
                recommendation: band,
                inventory_action: band.inventory_action().to_string(),
                rationale: band.rationale().to_string(),
            }
        })
        .collect();

    scored.sort_by(|a, b| b.engagement_score.total_cmp(&a.engagement_score));
    for (i, rec) in scored.iter_mut().enumerate() {
        rec.rank = i + 1;
    }

    tracing::info!(categories = scored.len(), "scored categories");
    scored
}

/// Score trending titles that pass the acquisition filter.
///
/// Eligible titles have `avg_polarity > min_polarity`, more than
/// `min_topics` distinct topics and more than `min_mentions` mentions.
/// Titles without a scored mention are never eligible. Ineligible titles
/// are dropped, not scored at zero. Ties keep their input order.
#[must_use]
pub fn score_acquisitions(
    items: &[TrendingItem],
    policy: &AcquisitionPolicy,
) -> Vec<AcquisitionRecommendation> {
    #[allow(clippy::cast_precision_loss)]
    let mut picks: Vec<AcquisitionRecommendation> = items
        .iter()
        .filter_map(|item| {
            let polarity = item.avg_polarity?;
            let eligible = polarity > policy.min_polarity
                && item.distinct_topics > policy.min_topics
                && item.mention_count > policy.min_mentions;
            eligible.then(|| AcquisitionRecommendation {
                title: item.name.clone(),
                mention_count: item.mention_count,
                distinct_topics: item.distinct_topics,
                avg_polarity: polarity,
                acquisition_score: policy.polarity_weight * polarity
                    + policy.topics_weight * item.distinct_topics as f64
                    + policy.mentions_weight * item.mention_count as f64,
                rank: 0,
            })
        })
        .collect();

    picks.sort_by(|a, b| b.acquisition_score.total_cmp(&a.acquisition_score));
    for (i, pick) in picks.iter_mut().enumerate() {
        pick.rank = i + 1;
    }

    tracing::info!(candidates = items.len(), picks = picks.len(), "scored acquisitions");
    picks
}

/// How much of each ranking the inventory plan carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    pub top_categories: usize,
    pub max_titles: usize,
}

impl PlanLimits {
    #[must_use]
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self {
            top_categories: config.category_scoring.top_categories,
            max_titles: config.acquisition.max_recommendations,
        }
    }
}

/// Category and title recommendations combined for the buying team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryPlan {
    pub high_performing_categories: Vec<String>,
    pub category_recommendations: Vec<CategoryRecommendation>,
    pub title_recommendations: Vec<AcquisitionRecommendation>,
}

/// Expects both inputs already ranked.
#[must_use]
pub fn build_inventory_plan(
    categories: &[CategoryRecommendation],
    acquisitions: &[AcquisitionRecommendation],
    limits: PlanLimits,
) -> InventoryPlan {
    InventoryPlan {
        high_performing_categories: categories
            .iter()
            .take(limits.top_categories)
            .map(|c| c.category_name.clone())
            .collect(),
        category_recommendations: categories.to_vec(),
        title_recommendations: acquisitions.iter().take(limits.max_titles).cloned().collect(),
    }
}

#[cfg(test)]
#[path = "scoring_test.rs"]
mod tests;
