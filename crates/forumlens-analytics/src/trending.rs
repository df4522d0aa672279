//! Windowed topic ranking and title-mention trending.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use forumlens_core::{EngagementWeights, Post, SentimentLabel, TopicId, TrendingPolicy};
use forumlens_sentiment::SentimentIndex;

use crate::stats::{mean, SentimentMix};
use crate::titles::extract_titles;

/// Recency window for [`rank_trending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendWindow {
    pub as_of: DateTime<Utc>,
    pub window_days: u32,
    pub top_n: usize,
}

impl TrendWindow {
    #[must_use]
    pub fn from_policy(as_of: DateTime<Utc>, policy: &TrendingPolicy) -> Self {
        Self {
            as_of,
            window_days: policy.window_days,
            top_n: policy.top_n,
        }
    }

    /// Earliest eligible timestamp, `None` if the window reaches past the
    /// representable range (every dated post is then eligible).
    fn cutoff(&self) -> Option<DateTime<Utc>> {
        self.as_of
            .checked_sub_signed(TimeDelta::try_days(i64::from(self.window_days))?)
    }
}

/// A topic or title ranked by engagement or mentions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingItem {
    pub name: String,
    /// Posts that mention the item (for topics: posts in the topic).
    pub mention_count: usize,
    /// Mean polarity of the scored mentions.
    pub avg_polarity: Option<f64>,
    pub distinct_topics: usize,
    pub reply_count: usize,
    /// Sum of view counters over the topics involved; absent if none has one.
    pub view_count: Option<u64>,
    pub engagement_score: f64,
    pub sentiment: Option<SentimentMix>,
}

#[derive(Debug, Default)]
struct Mentions {
    posts: usize,
    replies: usize,
    topics: BTreeSet<TopicId>,
    polarities: Vec<f64>,
    labels: Vec<SentimentLabel>,
}

impl Mentions {
    fn add(&mut self, post: &Post, sentiment: &SentimentIndex) {
        self.posts += 1;
        if !post.is_topic {
            self.replies += 1;
        }
        self.topics.insert(post.topic_id);
        if let Some(score) = sentiment.get(&post.id) {
            self.polarities.push(score.polarity);
            self.labels.push(score.label);
        }
    }

    fn into_item(
        self,
        name: String,
        view_count: Option<u64>,
        weights: &EngagementWeights,
    ) -> TrendingItem {
        TrendingItem {
            name,
            mention_count: self.posts,
            avg_polarity: mean(&self.polarities),
            distinct_topics: self.topics.len(),
            reply_count: self.replies,
            view_count,
            engagement_score: engagement_score(self.replies, view_count, weights),
            sentiment: SentimentMix::from_labels(self.labels),
        }
    }
}

/// `replies * reply_weight + views * view_weight`; absent views add nothing.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn engagement_score(replies: usize, views: Option<u64>, weights: &EngagementWeights) -> f64 {
    replies as f64 * weights.reply + views.map_or(0.0, |v| v as f64) * weights.view
}

/// Title and view counter of every topic, keyed by topic id.
fn topic_meta(posts: &[Post]) -> HashMap<TopicId, (Option<&str>, Option<u64>)> {
    posts
        .iter()
        .filter(|p| p.is_topic)
        .map(|p| (p.topic_id, (p.title.as_deref(), p.view_count)))
        .collect()
}

/// Topics ranked by engagement over posts created inside `window`.
///
/// Rows with `mention_count <= policy.min_mentions` are dropped. Sorted by
/// engagement descending, then mention count descending, then name. Zero
/// eligible posts yields an empty vector.
#[must_use]
pub fn rank_trending(
    posts: &[Post],
    sentiment: &SentimentIndex,
    window: &TrendWindow,
    weights: &EngagementWeights,
    policy: &TrendingPolicy,
) -> Vec<TrendingItem> {
    let cutoff = window.cutoff();
    let meta = topic_meta(posts);

    let mut by_topic: BTreeMap<TopicId, Mentions> = BTreeMap::new();
    for post in posts {
        let Some(created_at) = post.created_at else {
            continue;
        };
        if cutoff.is_some_and(|c| created_at < c) {
            continue;
        }
        by_topic.entry(post.topic_id).or_default().add(post, sentiment);
    }

    if by_topic.is_empty() {
        tracing::info!(window_days = window.window_days, "no posts inside trending window");
        return Vec::new();
    }

    // BTreeMap order makes the topic id the final tie-breaker.
    let mut items: Vec<TrendingItem> = by_topic
        .into_iter()
        .filter(|(_, m)| m.posts > policy.min_mentions)
        .map(|(topic_id, mentions)| {
            let (title, views) = meta.get(&topic_id).copied().unwrap_or((None, None));
            let name = title.map_or_else(|| format!("topic {topic_id}"), ToString::to_string);
            mentions.into_item(name, views, weights)
        })
        .collect();

    items.sort_by(|a, b| {
        b.engagement_score
            .total_cmp(&a.engagement_score)
            .then_with(|| b.mention_count.cmp(&a.mention_count))
            .then_with(|| a.name.cmp(&b.name))
    });
    items.truncate(window.top_n);

    tracing::info!(trending = items.len(), "ranked trending topics");
    items
}

fn polarity_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Film titles mentioned across all post bodies.
///
/// Each post counts at most once per title. Rows with
/// `mention_count <= policy.min_mentions` are dropped. Sorted by mentions
/// descending, then average polarity descending (unscored last), then name.
#[must_use]
pub fn trending_titles(
    posts: &[Post],
    sentiment: &SentimentIndex,
    weights: &EngagementWeights,
    policy: &TrendingPolicy,
) -> Vec<TrendingItem> {
    let meta = topic_meta(posts);

    let mut by_title: BTreeMap<String, Mentions> = BTreeMap::new();
    for post in posts {
        for title in extract_titles(&post.content, &policy.title_stoplist, policy.min_title_len) {
            by_title.entry(title).or_default().add(post, sentiment);
        }
    }

    let mut items: Vec<TrendingItem> = by_title
        .into_iter()
        .filter(|(_, m)| m.posts > policy.min_mentions)
        .map(|(title, mentions)| {
            let views = mentions
                .topics
                .iter()
                .filter_map(|id| meta.get(id).and_then(|(_, v)| *v))
                .fold(None, |acc: Option<u64>, v| Some(acc.unwrap_or(0).saturating_add(v)));
            mentions.into_item(title, views, weights)
        })
        .collect();

    items.sort_by(|a, b| {
        b.mention_count
            .cmp(&a.mention_count)
            .then_with(|| polarity_desc(a.avg_polarity, b.avg_polarity))
            .then_with(|| a.name.cmp(&b.name))
    });

    if items.is_empty() {
        tracing::warn!("no film titles mentioned often enough to trend");
    } else {
        tracing::info!(titles = items.len(), "identified trending titles");
    }
    items
}

#[cfg(test)]
#[path = "trending_test.rs"]
mod tests;
