//! Conversion of raw export rows into the typed [`Post`] and [`Category`] tables.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use forumlens_core::{Category, Post, TopicId};

use crate::error::IngestError;
use crate::relative_time::parse_relative_time;
use crate::source::TableKind;
use crate::types::{RawCategory, RawReply, RawTopic};

/// The post table plus what was dropped or left undated while building it.
#[derive(Debug, Clone)]
pub struct PostBuild {
    pub posts: Vec<Post>,
    /// Replies whose `topic_id` matches no topic in the export.
    pub orphan_replies: usize,
    /// Posts whose date string could not be resolved.
    pub undated: usize,
}

/// Combines topics and replies into one post table.
///
/// Each topic is followed by its replies in export order. Replies inherit
/// the category of their topic. Dates are resolved against `now`.
///
/// # Errors
///
/// Returns [`IngestError::Validation`] if two topics, or two replies, share an id.
pub fn build_posts(
    topics: &[RawTopic],
    replies: &[RawReply],
    now: DateTime<Utc>,
) -> Result<PostBuild, IngestError> {
    let mut seen_topics = HashSet::new();
    for topic in topics {
        if !seen_topics.insert(topic.id) {
            return Err(IngestError::Validation {
                table: TableKind::Topics,
                reason: format!("duplicate topic id {}", topic.id),
            });
        }
    }

    let mut seen_replies = HashSet::new();
    let mut replies_by_topic: HashMap<TopicId, Vec<&RawReply>> = HashMap::new();
    let mut orphan_replies = 0usize;
    for reply in replies {
        if !seen_replies.insert(reply.id) {
            return Err(IngestError::Validation {
                table: TableKind::Replies,
                reason: format!("duplicate reply id {}", reply.id),
            });
        }
        match reply.topic_id {
            Some(topic_id) if seen_topics.contains(&topic_id) => {
                replies_by_topic.entry(topic_id).or_default().push(reply);
            }
            _ => orphan_replies += 1,
        }
    }

    if orphan_replies > 0 {
        tracing::warn!(
            orphan_replies,
            "replies reference unknown topics; dropped from the post table"
        );
    }

    let resolve = |date: Option<&str>| date.and_then(|d| parse_relative_time(d, now));

    let mut posts = Vec::with_capacity(topics.len() + replies.len());
    for topic in topics {
        posts.push(Post {
            id: format!("t{}", topic.id),
            topic_id: topic.id,
            author: topic.author.clone().unwrap_or_default(),
            content: topic.content.clone().unwrap_or_default(),
            created_at: resolve(topic.date.as_deref()),
            is_topic: true,
            category_id: topic.category,
            title: topic.title.clone().filter(|t| !t.trim().is_empty()),
            view_count: topic.views,
        });

        for reply in replies_by_topic.get(&topic.id).into_iter().flatten() {
            posts.push(Post {
                id: format!("r{}", reply.id),
                topic_id: topic.id,
                author: reply.author.clone().unwrap_or_default(),
                content: reply.content.clone().unwrap_or_default(),
                created_at: resolve(reply.date.as_deref()),
                is_topic: false,
                category_id: topic.category,
                title: None,
                view_count: None,
            });
        }
    }

    let undated = posts.iter().filter(|p| p.created_at.is_none()).count();
    if undated > 0 {
        tracing::warn!(undated, "posts with unrecognized dates kept without a timestamp");
    }

    tracing::info!(
        topics = topics.len(),
        posts = posts.len(),
        orphan_replies,
        "built post table"
    );

    Ok(PostBuild {
        posts,
        orphan_replies,
        undated,
    })
}

/// Validates and converts the category export.
///
/// # Errors
///
/// Returns [`IngestError::Validation`] on duplicate ids or blank names.
pub fn build_categories(raw: &[RawCategory]) -> Result<Vec<Category>, IngestError> {
    let mut seen = HashSet::new();
    let mut categories = Vec::with_capacity(raw.len());

    for category in raw {
        let name = category.name.trim();
        if name.is_empty() {
            return Err(IngestError::Validation {
                table: TableKind::Categories,
                reason: format!("category {} has an empty name", category.id),
            });
        }
        if !seen.insert(category.id) {
            return Err(IngestError::Validation {
                table: TableKind::Categories,
                reason: format!("duplicate category id {}", category.id),
            });
        }
        categories.push(Category {
            id: category.id,
            name: name.to_string(),
        });
    }

    Ok(categories)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
