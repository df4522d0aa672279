//! Per-post sentiment for forumlens.
//!
//! Scores posts with a pluggable [`SentimentClassifier`] (a DVD-domain
//! lexicon by default), joins externally produced scores to posts through
//! [`SentimentIndex`], and extracts frequency-ranked keywords.

pub mod classifier;
pub mod error;
pub mod gate;
pub mod keywords;
pub mod scorer;
pub mod text;

pub use classifier::{score_posts, LexiconClassifier, Polarity, SentimentClassifier};
pub use error::SentimentError;
pub use gate::SentimentIndex;
pub use keywords::{extract_keywords, top_keywords, KeywordCount};
pub use scorer::{lexicon_score, LexiconScore};
pub use text::clean_text;
