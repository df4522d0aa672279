//! Stopword-filtered keyword frequency ranking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::text::clean_text;

/// English function words plus forum filler that carries no topic signal.
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "can", "will", "just",
    "should", "would", "could", "also", "still", "even", "much", "well", "thing", "things",
    // forum filler
    "film", "films", "movie", "movies", "watch", "watched", "watching", "scene", "character",
    "like", "really", "think", "good", "great", "one", "see", "get", "know", "anyone",
];

/// Minimum token length kept as a keyword (exclusive).
const MIN_KEYWORD_LEN: usize = 3;

/// Keyword with its frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

fn tokens(text: &str) -> Vec<String> {
    clean_text(text)
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_KEYWORD_LEN && !STOPWORDS.contains(w))
        .map(str::to_owned)
        .collect()
}

fn rank(counts: HashMap<String, usize>, n: usize) -> Vec<KeywordCount> {
    let mut ranked: Vec<KeywordCount> = counts
        .into_iter()
        .map(|(keyword, count)| KeywordCount { keyword, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
    ranked.truncate(n);
    ranked
}

/// The `n` most frequent keywords of one text, ties broken alphabetically.
///
/// Returns an empty vector for empty or all-stopword text.
#[must_use]
pub fn extract_keywords(text: &str, n: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in tokens(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    rank(counts, n).into_iter().map(|k| k.keyword).collect()
}

/// Corpus-wide keyword frequencies over `texts`, top `n` first.
#[must_use]
pub fn top_keywords<'a, I>(texts: I, n: usize) -> Vec<KeywordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in texts {
        for token in tokens(text) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }
    rank(counts, n)
}
