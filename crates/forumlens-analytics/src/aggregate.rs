//! Category, period and post-type aggregates.
//!
//! Every function here is a pure function of its inputs. Rows come out
//! sorted ascending by their group key, and groups with no scored post are
//! omitted rather than reported with undefined percentages.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use forumlens_core::{Category, CategoryId, Granularity, Post, SentimentLabel, SentimentScore, TopicId};
use forumlens_sentiment::SentimentIndex;

use crate::period::bucket_start;
use crate::stats::{mean, ratio, PolarityStats, SentimentMix};

/// Sentiment statistics and activity counts for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category_name: String,
    pub avg_polarity: f64,
    pub median_polarity: Option<f64>,
    /// Sample standard deviation; absent below two scored posts.
    pub std_polarity: Option<f64>,
    /// All posts in the category, scored or not.
    pub post_count: usize,
    /// Posts with a sentiment score. Percentages are over this count.
    pub scored_count: usize,
    pub pct_positive: f64,
    pub pct_neutral: f64,
    pub pct_negative: f64,
    pub topic_count: usize,
    pub reply_count: usize,
    pub unique_topics: usize,
    pub avg_subjectivity: Option<f64>,
}

/// Category summaries plus what could not be attributed to a category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub summaries: Vec<CategorySummary>,
    /// Posts whose `category_id` names no known category.
    pub unresolved: usize,
    /// Resolved posts without a sentiment score.
    pub unscored: usize,
}

/// Forum activity in one calendar bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityTrend {
    pub period_start: NaiveDate,
    pub topic_count: usize,
    pub reply_count: usize,
    /// Sum of topic view counters; absent when no topic in the bucket has one.
    pub view_count: Option<u64>,
    /// `reply_count / topic_count`.
    pub engagement_ratio: f64,
}

/// Sentiment statistics in one calendar bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentTrend {
    pub period_start: NaiveDate,
    pub avg_polarity: f64,
    pub median_polarity: Option<f64>,
    pub std_polarity: Option<f64>,
    /// Scored posts in the bucket.
    pub post_count: usize,
    pub pct_positive: f64,
}

/// Forum-wide sentiment, including posts with no resolvable category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSentiment {
    pub total_posts: usize,
    pub scored_posts: usize,
    pub avg_polarity: f64,
    pub median_polarity: Option<f64>,
    pub std_polarity: Option<f64>,
    pub avg_subjectivity: Option<f64>,
    pub pct_positive: f64,
    pub pct_neutral: f64,
    pub pct_negative: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Topic,
    Reply,
}

/// Sentiment of opening posts against replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostTypeSentiment {
    pub post_type: PostType,
    pub post_count: usize,
    pub scored_count: usize,
    pub avg_polarity: f64,
    pub avg_subjectivity: Option<f64>,
    pub pct_positive: f64,
    pub pct_neutral: f64,
    pub pct_negative: f64,
}

/// Collects the scored side of a group.
#[derive(Debug, Default)]
struct SentimentAccumulator {
    polarities: Vec<f64>,
    labels: Vec<SentimentLabel>,
    subjectivities: Vec<f64>,
}

impl SentimentAccumulator {
    fn push(&mut self, score: &SentimentScore) {
        self.polarities.push(score.polarity);
        self.labels.push(score.label);
        if let Some(s) = score.subjectivity {
            self.subjectivities.push(s);
        }
    }

    fn scored(&self) -> usize {
        self.polarities.len()
    }

    /// `None` for a group without scored posts.
    fn finish(&self) -> Option<(PolarityStats, SentimentMix, Option<f64>)> {
        let stats = PolarityStats::of(&self.polarities)?;
        let mix = SentimentMix::from_labels(self.labels.iter().copied())?;
        Some((stats, mix, mean(&self.subjectivities)))
    }
}

#[derive(Debug, Default)]
struct CategoryGroup {
    post_count: usize,
    topic_count: usize,
    reply_count: usize,
    topics: BTreeSet<TopicId>,
    sentiment: SentimentAccumulator,
}

/// Sentiment and activity per category name.
///
/// Posts are joined `category_id -> Category.name`. Posts whose category is
/// unknown are dropped from the category rows and counted in `unresolved`;
/// they still count toward [`overall_sentiment`].
#[must_use]
pub fn summarize_by_category(
    posts: &[Post],
    sentiment: &SentimentIndex,
    categories: &[Category],
) -> CategoryBreakdown {
    let names: HashMap<CategoryId, &str> =
        categories.iter().map(|c| (c.id, c.name.as_str())).collect();

    let mut groups: BTreeMap<&str, CategoryGroup> = BTreeMap::new();
    let mut unresolved = 0usize;
    let mut unscored = 0usize;

    for post in posts {
        let Some(&name) = names.get(&post.category_id) else {
            unresolved += 1;
            continue;
        };
        let group = groups.entry(name).or_default();
        group.post_count += 1;
        if post.is_topic {
            group.topic_count += 1;
        } else {
            group.reply_count += 1;
        }
        group.topics.insert(post.topic_id);
        match sentiment.get(&post.id) {
            Some(score) => group.sentiment.push(score),
            None => unscored += 1,
        }
    }

    if unresolved > 0 {
        tracing::warn!(unresolved, "posts with unknown category excluded from category summary");
    }

    let summaries: Vec<CategorySummary> = groups
        .into_iter()
        .filter_map(|(name, group)| {
            let Some((stats, mix, avg_subjectivity)) = group.sentiment.finish() else {
                tracing::debug!(category = name, "category has no scored posts; omitted");
                return None;
            };
            Some(CategorySummary {
                category_name: name.to_string(),
                avg_polarity: stats.mean,
                median_polarity: Some(stats.median),
                std_polarity: stats.std,
                post_count: group.post_count,
                scored_count: group.sentiment.scored(),
                pct_positive: mix.pct_positive,
                pct_neutral: mix.pct_neutral,
                pct_negative: mix.pct_negative,
                topic_count: group.topic_count,
                reply_count: group.reply_count,
                unique_topics: group.topics.len(),
                avg_subjectivity,
            })
        })
        .collect();

    CategoryBreakdown {
        summaries,
        unresolved,
        unscored,
    }
}

#[derive(Debug, Default)]
struct PeriodCounts {
    topics: usize,
    replies: usize,
    views: Option<u64>,
}

/// Topic, reply and view counts per calendar bucket.
///
/// Undated posts are skipped. Buckets without a topic are omitted since
/// their engagement ratio is undefined.
#[must_use]
pub fn summarize_by_period(posts: &[Post], granularity: Granularity) -> Vec<ActivityTrend> {
    let mut buckets: BTreeMap<NaiveDate, PeriodCounts> = BTreeMap::new();
    let mut undated = 0usize;

    for post in posts {
        let Some(ts) = post.created_at else {
            undated += 1;
            continue;
        };
        let counts = buckets.entry(bucket_start(ts, granularity)).or_default();
        if post.is_topic {
            counts.topics += 1;
            if let Some(views) = post.view_count {
                counts.views = Some(counts.views.unwrap_or(0).saturating_add(views));
            }
        } else {
            counts.replies += 1;
        }
    }

    if undated > 0 {
        tracing::info!(undated, %granularity, "undated posts skipped in activity trend");
    }

    buckets
        .into_iter()
        .filter(|(_, c)| c.topics > 0)
        .map(|(period_start, c)| ActivityTrend {
            period_start,
            topic_count: c.topics,
            reply_count: c.replies,
            view_count: c.views,
            engagement_ratio: ratio(c.replies, c.topics),
        })
        .collect()
}

/// Sentiment statistics per calendar bucket over scored, dated posts.
#[must_use]
pub fn sentiment_by_period(
    posts: &[Post],
    sentiment: &SentimentIndex,
    granularity: Granularity,
) -> Vec<SentimentTrend> {
    let mut buckets: BTreeMap<NaiveDate, SentimentAccumulator> = BTreeMap::new();
    for post in posts {
        let (Some(ts), Some(score)) = (post.created_at, sentiment.get(&post.id)) else {
            continue;
        };
        buckets
            .entry(bucket_start(ts, granularity))
            .or_default()
            .push(score);
    }

    buckets
        .into_iter()
        .filter_map(|(period_start, acc)| {
            let (stats, mix, _) = acc.finish()?;
            Some(SentimentTrend {
                period_start,
                avg_polarity: stats.mean,
                median_polarity: Some(stats.median),
                std_polarity: stats.std,
                post_count: acc.scored(),
                pct_positive: mix.pct_positive,
            })
        })
        .collect()
}

/// Forum-wide sentiment; `None` when no post in `posts` is scored.
#[must_use]
pub fn overall_sentiment(posts: &[Post], sentiment: &SentimentIndex) -> Option<OverallSentiment> {
    let mut acc = SentimentAccumulator::default();
    for score in posts.iter().filter_map(|p| sentiment.get(&p.id)) {
        acc.push(score);
    }
    let (stats, mix, avg_subjectivity) = acc.finish()?;
    Some(OverallSentiment {
        total_posts: posts.len(),
        scored_posts: acc.scored(),
        avg_polarity: stats.mean,
        median_polarity: Some(stats.median),
        std_polarity: stats.std,
        avg_subjectivity,
        pct_positive: mix.pct_positive,
        pct_neutral: mix.pct_neutral,
        pct_negative: mix.pct_negative,
    })
}

/// Sentiment of topics against replies. A type with no scored post is omitted.
#[must_use]
pub fn compare_post_types(posts: &[Post], sentiment: &SentimentIndex) -> Vec<PostTypeSentiment> {
    let mut groups: BTreeMap<PostType, (usize, SentimentAccumulator)> = BTreeMap::new();
    for post in posts {
        let kind = if post.is_topic {
            PostType::Topic
        } else {
            PostType::Reply
        };
        let (count, acc) = groups.entry(kind).or_default();
        *count += 1;
        if let Some(score) = sentiment.get(&post.id) {
            acc.push(score);
        }
    }

    groups
        .into_iter()
        .filter_map(|(post_type, (post_count, acc))| {
            let (stats, mix, avg_subjectivity) = acc.finish()?;
            Some(PostTypeSentiment {
                post_type,
                post_count,
                scored_count: acc.scored(),
                avg_polarity: stats.mean,
                avg_subjectivity,
                pct_positive: mix.pct_positive,
                pct_neutral: mix.pct_neutral,
                pct_negative: mix.pct_negative,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
