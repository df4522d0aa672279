//! Heuristic extraction of film titles from post text.
//!
//! Matches quoted substrings and runs of two to six capitalized words. The
//! output is approximate and only feeds mention counting.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"'([^']+)'|"([^"]+)""#).expect("valid quoted-title regex"));
static CAPITALIZED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:[A-Z][a-z]*\s+){1,5}[A-Z][a-z]*\b").expect("valid capitalized-title regex")
});

/// Candidate titles in `text`, deduplicated and sorted.
///
/// Candidates equal to a `stoplist` entry or shorter than `min_len`
/// characters are discarded. Returns an empty vector when nothing matches.
#[must_use]
pub fn extract_titles(text: &str, stoplist: &[String], min_len: usize) -> Vec<String> {
    let quoted = QUOTED_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim());
    let capitalized = CAPITALIZED_RE.find_iter(text).map(|m| m.as_str().trim());

    quoted
        .chain(capitalized)
        .filter(|t| t.chars().count() >= min_len)
        .filter(|t| !stoplist.iter().any(|s| s == t))
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stoplist() -> Vec<String> {
        vec!["I think".to_string(), "In my opinion".to_string()]
    }

    #[test]
    fn quoted_and_capitalized_titles() {
        let titles = extract_titles(
            "Just rewatched \"Heat\" and then Blade Runner on the new disc.",
            &stoplist(),
            4,
        );
        assert_eq!(titles, ["Blade Runner", "Heat"]);
    }

    #[test]
    fn single_quotes_count() {
        let titles = extract_titles("the 'Criterion Alien' set", &stoplist(), 4);
        assert_eq!(titles, ["Criterion Alien"]);
    }

    #[test]
    fn stoplist_and_short_candidates_are_dropped() {
        let titles = extract_titles("I think \"Up\" holds up", &stoplist(), 4);
        assert!(titles.is_empty(), "got {titles:?}");
    }

    #[test]
    fn duplicates_collapse() {
        let titles = extract_titles("Blade Runner beats Blade Runner", &stoplist(), 4);
        assert_eq!(titles, ["Blade Runner"]);
    }

    #[test]
    fn no_match_is_empty() {
        assert!(extract_titles("all lowercase chatter here", &stoplist(), 4).is_empty());
        assert!(extract_titles("", &stoplist(), 4).is_empty());
    }
}
