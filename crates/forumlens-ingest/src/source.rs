//! File-backed table sources.

use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;

use forumlens_core::SentimentScore;

use crate::error::IngestError;
use crate::types::{ForumStats, RawCategory, RawReplies, RawReply, RawTopic};

/// Names the input tables for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Topics,
    Replies,
    Categories,
    Sentiment,
    Stats,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableKind::Topics => "topics",
            TableKind::Replies => "replies",
            TableKind::Categories => "categories",
            TableKind::Sentiment => "sentiment",
            TableKind::Stats => "stats",
        };
        f.write_str(name)
    }
}

/// Why a table could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsentReason {
    NotFound,
    Unreadable(String),
    Malformed(String),
    Empty,
}

impl fmt::Display for AbsentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbsentReason::NotFound => f.write_str("file not found"),
            AbsentReason::Unreadable(e) => write!(f, "file unreadable: {e}"),
            AbsentReason::Malformed(e) => write!(f, "malformed JSON: {e}"),
            AbsentReason::Empty => f.write_str("table is empty"),
        }
    }
}

/// Outcome of loading one table.
#[derive(Debug)]
pub enum TableLoad<T> {
    Present(Vec<T>),
    Absent(AbsentReason),
}

impl<T> TableLoad<T> {
    /// Treat the table as mandatory.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::MissingInput`] when the table is absent.
    pub fn require(self, table: TableKind) -> Result<Vec<T>, IngestError> {
        match self {
            TableLoad::Present(rows) => Ok(rows),
            TableLoad::Absent(reason) => Err(IngestError::MissingInput { table, reason }),
        }
    }

    /// Rows if present, `None` otherwise.
    #[must_use]
    pub fn present(self) -> Option<Vec<T>> {
        match self {
            TableLoad::Present(rows) => Some(rows),
            TableLoad::Absent(_) => None,
        }
    }

    fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            TableLoad::Absent(AbsentReason::Empty)
        } else {
            TableLoad::Present(rows)
        }
    }
}

fn read_json<D: DeserializeOwned>(path: &Path) -> Result<D, AbsentReason> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(AbsentReason::NotFound),
        Err(e) => return Err(AbsentReason::Unreadable(e.to_string())),
    };
    serde_json::from_str(&content).map_err(|e| AbsentReason::Malformed(e.to_string()))
}

fn finish<T>(table: TableKind, path: &Path, result: Result<Vec<T>, AbsentReason>) -> TableLoad<T> {
    let load = match result {
        Ok(rows) => TableLoad::from_rows(rows),
        Err(reason) => TableLoad::Absent(reason),
    };
    match &load {
        TableLoad::Present(rows) => {
            tracing::info!(%table, rows = rows.len(), path = %path.display(), "loaded table");
        }
        TableLoad::Absent(reason) => {
            tracing::warn!(%table, path = %path.display(), %reason, "table unavailable");
        }
    }
    load
}

/// Load `forum-topics.json`.
#[must_use]
pub fn load_topics(path: &Path) -> TableLoad<RawTopic> {
    finish(TableKind::Topics, path, read_json(path))
}

/// Load `forum-replies.json` in either of its shapes, returning a flat list
/// where every reply carries its `topic_id`.
///
/// Map keys that are not integers, and flat rows without a `topic_id`, are
/// dropped with a warning.
#[must_use]
pub fn load_replies(path: &Path) -> TableLoad<RawReply> {
    let flattened = read_json::<RawReplies>(path).map(|raw| match raw {
        RawReplies::ByTopic(by_topic) => {
            let mut rows = Vec::new();
            for (key, replies) in by_topic {
                let Ok(topic_id) = key.trim().parse() else {
                    tracing::warn!(key = %key, dropped = replies.len(), "non-numeric topic key in replies export");
                    continue;
                };
                rows.extend(replies.into_iter().map(|mut reply| {
                    reply.topic_id = Some(topic_id);
                    reply
                }));
            }
            rows
        }
        RawReplies::Flat(rows) => {
            let total = rows.len();
            let kept: Vec<RawReply> = rows.into_iter().filter(|r| r.topic_id.is_some()).collect();
            if kept.len() < total {
                tracing::warn!(dropped = total - kept.len(), "replies without topic_id dropped");
            }
            kept
        }
    });
    finish(TableKind::Replies, path, flattened)
}

/// Load `forum-categories.json`.
#[must_use]
pub fn load_categories(path: &Path) -> TableLoad<RawCategory> {
    finish(TableKind::Categories, path, read_json(path))
}

/// Load a pre-computed sentiment table (`[{post_id, polarity, label}]`).
#[must_use]
pub fn load_sentiment(path: &Path) -> TableLoad<SentimentScore> {
    finish(TableKind::Sentiment, path, read_json(path))
}

/// Load the optional `forum-stats.json` object.
#[must_use]
pub fn load_stats(path: &Path) -> Option<ForumStats> {
    match read_json::<ForumStats>(path) {
        Ok(stats) => {
            tracing::info!(table = %TableKind::Stats, keys = stats.0.len(), "loaded forum stats");
            Some(stats)
        }
        Err(reason) => {
            tracing::debug!(table = %TableKind::Stats, %reason, "forum stats unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_file_is_absent_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let load = load_topics(&dir.path().join("forum-topics.json"));
        assert!(matches!(load, TableLoad::Absent(AbsentReason::NotFound)));
    }

    #[test]
    fn malformed_file_is_absent_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "forum-categories.json", "[{\"id\": 1,");
        let load = load_categories(&path);
        assert!(matches!(load, TableLoad::Absent(AbsentReason::Malformed(_))));
    }

    #[test]
    fn empty_array_is_absent_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "forum-topics.json", "[]");
        let load = load_topics(&path);
        assert!(matches!(load, TableLoad::Absent(AbsentReason::Empty)));
    }

    #[test]
    fn require_names_the_missing_table() {
        let load: TableLoad<RawTopic> = TableLoad::Absent(AbsentReason::NotFound);
        let err = load.require(TableKind::Topics).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingInput {
                table: TableKind::Topics,
                reason: AbsentReason::NotFound
            }
        ));
        assert_eq!(
            err.to_string(),
            "required table topics is unavailable: file not found"
        );
    }

    #[test]
    fn replies_map_assigns_topic_ids_and_skips_bad_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "forum-replies.json",
            r#"{"2": [{"id": 5, "content": "a"}, {"id": 6, "content": "b"}], "oops": [{"id": 7}]}"#,
        );
        let rows = load_replies(&path).present().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.topic_id == Some(2)));
    }

    #[test]
    fn flat_replies_without_topic_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "forum-replies.json",
            r#"[{"id": 5, "topic_id": 1}, {"id": 6}]"#,
        );
        let rows = load_replies(&path).present().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 5);
    }

    #[test]
    fn sentiment_table_loads_scores() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "scores.json",
            r#"[{"post_id": "t1", "polarity": 0.4, "label": "positive"}]"#,
        );
        let rows = load_sentiment(&path).require(TableKind::Sentiment).unwrap();
        assert_eq!(rows[0].post_id, "t1");
        assert!(rows[0].subjectivity.is_none());
    }

    #[test]
    fn stats_are_optional() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_stats(&dir.path().join("forum-stats.json")).is_none());
        let path = write_file(&dir, "forum-stats.json", r#"{"members": 120, "online": 4}"#);
        let stats = load_stats(&path).unwrap();
        assert_eq!(stats.0["members"], 120);
    }
}
