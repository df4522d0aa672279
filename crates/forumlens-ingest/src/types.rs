//! Serde shapes of the forum exports as they appear on disk.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use forumlens_core::{CategoryId, TopicId};

#[derive(Debug, Clone, Deserialize)]
pub struct RawTopic {
    pub id: TopicId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// Relative date string such as `"2 hours ago"`.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(alias = "category_id")]
    pub category: CategoryId,
    /// Reply counter as displayed by the forum. Informational only; reply
    /// counts used in analytics come from the replies export.
    #[serde(default)]
    pub replies: Option<u64>,
    #[serde(default)]
    pub views: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawReply {
    pub id: i64,
    /// Present in the flat export; filled from the map key otherwise.
    #[serde(default)]
    pub topic_id: Option<TopicId>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// The replies export comes either keyed by topic id or as a flat list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawReplies {
    ByTopic(BTreeMap<String, Vec<RawReply>>),
    Flat(Vec<RawReply>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCategory {
    pub id: CategoryId,
    pub name: String,
}

/// Free-form forum counters (members online, totals, ...), passed through
/// to the executive summary untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForumStats(pub serde_json::Map<String, Value>);
