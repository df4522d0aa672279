//! Human-readable trend report.

use std::fmt;

use chrono::{DateTime, Utc};

use forumlens_core::Granularity;
use forumlens_sentiment::KeywordCount;

use crate::aggregate::{ActivityTrend, CategorySummary, OverallSentiment, SentimentTrend};
use crate::scoring::{AcquisitionRecommendation, CategoryRecommendation};
use crate::trending::TrendingItem;

pub const REPORT_FILE: &str = "forum_trend_report.md";

/// Keywords most used inside one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryKeywords {
    pub category_name: String,
    pub keywords: Vec<String>,
}

/// Everything the markdown report shows. Render it with `to_string()`.
#[derive(Debug, Clone, Copy)]
pub struct TrendReport<'a> {
    pub as_of: DateTime<Utc>,
    pub granularity: Granularity,
    pub overall: &'a OverallSentiment,
    pub categories: &'a [CategoryRecommendation],
    pub summaries: &'a [CategorySummary],
    pub activity: &'a [ActivityTrend],
    pub sentiment_trends: &'a [SentimentTrend],
    pub trending_topics: &'a [TrendingItem],
    pub trending_titles: &'a [TrendingItem],
    pub acquisitions: &'a [AcquisitionRecommendation],
    pub keywords: &'a [KeywordCount],
    pub category_keywords: &'a [CategoryKeywords],
}

fn polarity_cell(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

impl TrendReport<'_> {
    fn overview(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.overall;
        writeln!(f, "## Overview")?;
        writeln!(f)?;
        writeln!(f, "- Posts analyzed: {} ({} scored)", o.total_posts, o.scored_posts)?;
        writeln!(f, "- Average polarity: {:.2}", o.avg_polarity)?;
        writeln!(
            f,
            "- Sentiment mix: {:.1}% positive, {:.1}% neutral, {:.1}% negative",
            o.pct_positive, o.pct_neutral, o.pct_negative
        )?;
        writeln!(f)
    }

    fn categories(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Category performance")?;
        writeln!(f)?;
        if self.categories.is_empty() {
            writeln!(f, "No category had enough activity to score.")?;
            return writeln!(f);
        }
        writeln!(f, "| Rank | Category | Score | Sentiment | Posts | Recommendation |")?;
        writeln!(f, "|---:|---|---:|---:|---:|---|")?;
        for c in self.categories {
            writeln!(
                f,
                "| {} | {} | {:.2} | {:.2} | {} | {} |",
                c.rank, c.category_name, c.engagement_score, c.sentiment, c.post_count, c.recommendation
            )?;
        }
        writeln!(f)?;
        for ck in self.category_keywords.iter().filter(|ck| !ck.keywords.is_empty()) {
            writeln!(f, "- **{}**: {}", ck.category_name, ck.keywords.join(", "))?;
        }
        if !self.category_keywords.is_empty() {
            writeln!(f)?;
        }
        Ok(())
    }

    fn category_sentiment(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Sentiment by category")?;
        writeln!(f)?;
        if self.summaries.is_empty() {
            writeln!(f, "No categorized posts.")?;
            return writeln!(f);
        }
        writeln!(f, "| Category | Topics | Posts | Avg sentiment | % positive |")?;
        writeln!(f, "|---|---:|---:|---:|---:|")?;
        for s in self.summaries {
            writeln!(
                f,
                "| {} | {} | {} | {:.2} | {:.1} |",
                s.category_name, s.topic_count, s.post_count, s.avg_polarity, s.pct_positive
            )?;
        }
        writeln!(f)
    }

    fn activity(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Activity by {}", self.granularity)?;
        writeln!(f)?;
        if self.activity.is_empty() {
            writeln!(f, "No dated topics.")?;
            return writeln!(f);
        }
        writeln!(f, "| Period | Topics | Replies | Views | Replies per topic |")?;
        writeln!(f, "|---|---:|---:|---:|---:|")?;
        for row in self.activity {
            let views = row
                .view_count
                .map_or_else(|| "n/a".to_string(), |v| v.to_string());
            writeln!(
                f,
                "| {} | {} | {} | {} | {:.2} |",
                row.period_start, row.topic_count, row.reply_count, views, row.engagement_ratio
            )?;
        }
        writeln!(f)
    }

    fn sentiment_over_time(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Sentiment by {}", self.granularity)?;
        writeln!(f)?;
        if self.sentiment_trends.is_empty() {
            writeln!(f, "No dated scored posts.")?;
            return writeln!(f);
        }
        writeln!(f, "| Period | Posts | Avg sentiment | % positive |")?;
        writeln!(f, "|---|---:|---:|---:|")?;
        for row in self.sentiment_trends {
            writeln!(
                f,
                "| {} | {} | {:.2} | {:.1} |",
                row.period_start, row.post_count, row.avg_polarity, row.pct_positive
            )?;
        }
        writeln!(f)
    }

    fn trending(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Trending topics")?;
        writeln!(f)?;
        if self.trending_topics.is_empty() {
            writeln!(f, "Nothing trended in the window.")?;
        }
        for (i, t) in self.trending_topics.iter().enumerate() {
            writeln!(
                f,
                "{}. {} ({} mentions, engagement {:.1}, polarity {})",
                i + 1,
                t.name,
                t.mention_count,
                t.engagement_score,
                polarity_cell(t.avg_polarity)
            )?;
        }
        writeln!(f)?;

        writeln!(f, "## Most discussed titles")?;
        writeln!(f)?;
        if self.trending_titles.is_empty() {
            writeln!(f, "No titles detected.")?;
        }
        for t in self.trending_titles.iter().take(10) {
            writeln!(
                f,
                "- {}: {} mentions across {} topics, polarity {}",
                t.name,
                t.mention_count,
                t.distinct_topics,
                polarity_cell(t.avg_polarity)
            )?;
        }
        writeln!(f)
    }

    fn acquisitions(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Acquisition candidates")?;
        writeln!(f)?;
        if self.acquisitions.is_empty() {
            writeln!(f, "No title met the acquisition criteria.")?;
            return writeln!(f);
        }
        writeln!(f, "| Rank | Title | Score | Mentions | Topics | Polarity |")?;
        writeln!(f, "|---:|---|---:|---:|---:|---:|")?;
        for a in self.acquisitions {
            writeln!(
                f,
                "| {} | {} | {:.2} | {} | {} | {:.2} |",
                a.rank, a.title, a.acquisition_score, a.mention_count, a.distinct_topics, a.avg_polarity
            )?;
        }
        writeln!(f)
    }
}

impl fmt::Display for TrendReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Forum trend report")?;
        writeln!(f)?;
        writeln!(f, "As of {}", self.as_of.format("%Y-%m-%d %H:%M UTC"))?;
        writeln!(f)?;
        self.overview(f)?;
        self.categories(f)?;
        self.category_sentiment(f)?;
        self.activity(f)?;
        self.sentiment_over_time(f)?;
        self.trending(f)?;
        self.acquisitions(f)?;

        writeln!(f, "## Top keywords")?;
        writeln!(f)?;
        let words: Vec<String> = self
            .keywords
            .iter()
            .map(|k| format!("{} ({})", k.keyword, k.count))
            .collect();
        if words.is_empty() {
            writeln!(f, "None.")
        } else {
            writeln!(f, "{}", words.join(", "))
        }
    }
}
