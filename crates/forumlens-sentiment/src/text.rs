//! Text normalization applied before scoring and keyword extraction.

use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:https?://|www\.)\S+").expect("valid url regex"));
static NON_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\s]+").expect("valid non-letter regex"));
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid space regex"));

/// Lowercases `text` and strips URLs, digits and punctuation, collapsing
/// whitespace to single spaces.
#[must_use]
pub fn clean_text(text: &str) -> String {
    let without_urls = URL_RE.replace_all(text, " ");
    let letters = NON_LETTER_RE.replace_all(&without_urls, " ");
    SPACE_RE
        .replace_all(&letters, " ")
        .trim()
        .to_lowercase()
}
