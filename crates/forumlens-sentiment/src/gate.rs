//! One-to-one join of sentiment scores onto posts.

use std::collections::{HashMap, HashSet};

use forumlens_core::{Post, SentimentScore};

use crate::error::SentimentError;

/// Sentiment scores keyed by post id, restricted to posts that exist.
///
/// Built once per run; aggregates look scores up through [`SentimentIndex::get`]
/// and treat a miss as "unscored".
#[derive(Debug, Clone)]
pub struct SentimentIndex {
    by_post: HashMap<String, SentimentScore>,
    unscored: usize,
    unknown: usize,
}

impl SentimentIndex {
    /// Join `scores` onto `posts`.
    ///
    /// Scores that name a post not in `posts` are ignored with a warning.
    /// Posts left without a score are counted as unscored.
    ///
    /// # Errors
    ///
    /// - [`SentimentError::DuplicateScore`] if a post id appears twice in `scores`.
    /// - [`SentimentError::NoScoredPosts`] if no post matches any score.
    pub fn build(posts: &[Post], scores: Vec<SentimentScore>) -> Result<Self, SentimentError> {
        let post_ids: HashSet<&str> = posts.iter().map(|p| p.id.as_str()).collect();

        let mut seen: HashSet<String> = HashSet::with_capacity(scores.len());
        let mut by_post = HashMap::with_capacity(scores.len());
        let mut unknown = 0usize;

        for score in scores {
            if !seen.insert(score.post_id.clone()) {
                return Err(SentimentError::DuplicateScore {
                    post_id: score.post_id,
                });
            }
            if post_ids.contains(score.post_id.as_str()) {
                by_post.insert(score.post_id.clone(), score);
            } else {
                unknown += 1;
            }
        }

        if unknown > 0 {
            tracing::warn!(unknown, "sentiment scores reference unknown posts; ignored");
        }

        if by_post.is_empty() {
            return Err(SentimentError::NoScoredPosts);
        }

        let unscored = posts.len() - by_post.len();
        if unscored > 0 {
            tracing::warn!(
                unscored,
                "posts without a sentiment score excluded from sentiment aggregates"
            );
        }

        Ok(Self {
            by_post,
            unscored,
            unknown,
        })
    }

    #[must_use]
    pub fn get(&self, post_id: &str) -> Option<&SentimentScore> {
        self.by_post.get(post_id)
    }

    /// Number of posts with a score.
    #[must_use]
    pub fn matched(&self) -> usize {
        self.by_post.len()
    }

    /// Number of posts without a score.
    #[must_use]
    pub fn unscored(&self) -> usize {
        self.unscored
    }

    /// Number of scores whose post id matched nothing.
    #[must_use]
    pub fn unknown(&self) -> usize {
        self.unknown
    }
}

#[cfg(test)]
mod tests {
    use forumlens_core::SentimentLabel;

    use super::*;

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            topic_id: 1,
            author: String::new(),
            content: String::new(),
            created_at: None,
            is_topic: id.starts_with('t'),
            category_id: 1,
            title: None,
            view_count: None,
        }
    }

    fn score(post_id: &str, polarity: f64) -> SentimentScore {
        SentimentScore {
            post_id: post_id.to_string(),
            polarity,
            label: SentimentLabel::Neutral,
            subjectivity: None,
        }
    }

    #[test]
    fn matched_and_unscored_are_counted() {
        let posts = vec![post("t1"), post("r1"), post("r2")];
        let index = SentimentIndex::build(&posts, vec![score("t1", 0.3), score("r2", -0.2)]).unwrap();
        assert_eq!(index.matched(), 2);
        assert_eq!(index.unscored(), 1);
        assert!(index.get("r1").is_none());
        assert_eq!(index.get("r2").map(|s| s.polarity), Some(-0.2));
    }

    #[test]
    fn duplicate_scores_are_rejected() {
        let posts = vec![post("t1")];
        let err = SentimentIndex::build(&posts, vec![score("t1", 0.1), score("t1", 0.2)]).unwrap_err();
        assert!(matches!(err, SentimentError::DuplicateScore { ref post_id } if post_id == "t1"));
    }

    #[test]
    fn unknown_posts_are_ignored() {
        let posts = vec![post("t1")];
        let index = SentimentIndex::build(&posts, vec![score("t1", 0.1), score("r99", 0.5)]).unwrap();
        assert_eq!(index.matched(), 1);
        assert_eq!(index.unknown(), 1);
        assert!(index.get("r99").is_none());
    }

    #[test]
    fn no_matches_is_an_error() {
        let posts = vec![post("t1")];
        let err = SentimentIndex::build(&posts, vec![score("t2", 0.1)]).unwrap_err();
        assert!(matches!(err, SentimentError::NoScoredPosts));
        let err = SentimentIndex::build(&posts, Vec::new()).unwrap_err();
        assert!(matches!(err, SentimentError::NoScoredPosts));
    }
}
