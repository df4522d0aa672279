//! Classifier seam and batch scoring of posts.

use forumlens_core::{Post, SentimentLabel, SentimentScore, SentimentThresholds};

use crate::scorer::lexicon_score;
use crate::text::clean_text;

/// Classifier output for one text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polarity {
    /// Conventionally in `[-1.0, 1.0]`.
    pub polarity: f64,
    /// In `[0.0, 1.0]` when the classifier reports it.
    pub subjectivity: Option<f64>,
}

/// Anything that can turn cleaned text into a polarity.
pub trait SentimentClassifier {
    fn classify(&self, text: &str) -> Polarity;
}

/// Default classifier backed by the domain lexicon in [`crate::scorer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconClassifier;

impl SentimentClassifier for LexiconClassifier {
    fn classify(&self, text: &str) -> Polarity {
        let score = lexicon_score(text);
        Polarity {
            polarity: score.polarity,
            subjectivity: Some(score.subjectivity),
        }
    }
}

/// Score every post, in input order.
///
/// Topics are classified on title plus body, replies on body alone. Empty
/// text after cleaning is scored as neutral with zero subjectivity without
/// consulting the classifier.
#[must_use]
pub fn score_posts<C>(
    posts: &[Post],
    classifier: &C,
    thresholds: &SentimentThresholds,
) -> Vec<SentimentScore>
where
    C: SentimentClassifier + ?Sized,
{
    let scores: Vec<SentimentScore> = posts
        .iter()
        .map(|post| {
            let cleaned = clean_text(&post.analysis_text());
            let result = if cleaned.is_empty() {
                Polarity {
                    polarity: 0.0,
                    subjectivity: Some(0.0),
                }
            } else {
                classifier.classify(&cleaned)
            };
            SentimentScore {
                post_id: post.id.clone(),
                polarity: result.polarity,
                label: SentimentLabel::from_polarity(result.polarity, thresholds),
                subjectivity: result.subjectivity,
            }
        })
        .collect();

    tracing::info!(posts = scores.len(), "scored posts");
    scores
}
