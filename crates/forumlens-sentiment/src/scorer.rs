//! Domain-specific lexicon scorer for home-video forum posts.

/// Domain-specific word weights.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("great", 0.4),
    ("good", 0.3),
    ("excellent", 0.5),
    ("amazing", 0.5),
    ("awesome", 0.4),
    ("love", 0.5),
    ("loved", 0.5),
    ("best", 0.5),
    ("favorite", 0.4),
    ("favourite", 0.4),
    ("recommend", 0.4),
    ("recommended", 0.4),
    ("classic", 0.3),
    ("masterpiece", 0.6),
    ("stunning", 0.5),
    ("beautiful", 0.4),
    ("crisp", 0.3),
    ("restored", 0.3),
    ("remastered", 0.3),
    ("uncut", 0.2),
    ("collectible", 0.3),
    ("worth", 0.3),
    ("enjoyed", 0.4),
    ("fun", 0.3),
    ("brilliant", 0.5),
    ("fantastic", 0.5),
    ("perfect", 0.5),
    ("thanks", 0.2),
    // Negative signals
    ("bad", -0.4),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("worst", -0.6),
    ("boring", -0.4),
    ("disappointing", -0.5),
    ("disappointed", -0.5),
    ("overrated", -0.3),
    ("scratched", -0.5),
    ("scratch", -0.4),
    ("defective", -0.6),
    ("broken", -0.5),
    ("bootleg", -0.6),
    ("fake", -0.5),
    ("pixelated", -0.4),
    ("blurry", -0.4),
    ("cut", -0.2),
    ("censored", -0.3),
    ("overpriced", -0.4),
    ("expensive", -0.2),
    ("skip", -0.3),
    ("waste", -0.5),
    ("problem", -0.3),
    ("hate", -0.5),
    ("poor", -0.4),
    ("missing", -0.3),
];

/// Words that flip and dampen the next lexicon hit ("not good").
const NEGATORS: &[&str] = &["not", "never", "no", "hardly"];

/// Weight multiplier applied to a negated lexicon hit.
const NEGATION_FACTOR: f64 = -0.5;

/// Result of scoring one text against the lexicon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexiconScore {
    /// Sum of matched weights clamped to `[-1.0, 1.0]`.
    pub polarity: f64,
    /// Share of words that carry an opinion weight, in `[0.0, 1.0]`.
    pub subjectivity: f64,
}

fn weight_of(word: &str) -> Option<f64> {
    LEXICON
        .iter()
        .find(|(lex_word, _)| *lex_word == word)
        .map(|&(_, weight)| weight)
}

/// Score a text string using the domain lexicon.
///
/// Splits text into lowercase words, sums matching weights (a preceding
/// negator flips and halves the weight), and clamps the result to
/// `[-1.0, 1.0]`. Returns zero polarity and subjectivity for empty or
/// unknown text.
#[must_use]
pub fn lexicon_score(text: &str) -> LexiconScore {
    let mut score = 0.0_f64;
    let mut words = 0usize;
    let mut hits = 0usize;
    let mut negated = false;

    for raw in text.split_whitespace() {
        let word = raw
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if word.is_empty() {
            continue;
        }
        words += 1;

        if NEGATORS.contains(&word.as_str()) {
            negated = true;
            continue;
        }

        if let Some(weight) = weight_of(&word) {
            hits += 1;
            score += if negated { weight * NEGATION_FACTOR } else { weight };
        }
        negated = false;
    }

    #[allow(clippy::cast_precision_loss)]
    let subjectivity = if words == 0 {
        0.0
    } else {
        (hits as f64 / words as f64).min(1.0)
    };

    LexiconScore {
        polarity: score.clamp(-1.0, 1.0),
        subjectivity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_returns_zero() {
        let s = lexicon_score("");
        assert_eq!(s.polarity, 0.0);
        assert_eq!(s.subjectivity, 0.0);
    }

    #[test]
    fn unknown_text_returns_zero() {
        assert_eq!(lexicon_score("the region two release").polarity, 0.0);
    }

    #[test]
    fn positive_keyword_returns_positive() {
        let score = lexicon_score("this transfer is stunning").polarity;
        assert!(score > 0.0, "expected positive score, got {score}");
    }

    #[test]
    fn negative_keyword_returns_negative() {
        let score = lexicon_score("my copy arrived scratched").polarity;
        assert!(score < 0.0, "expected negative score, got {score}");
    }

    #[test]
    fn negator_flips_and_dampens() {
        let plain = lexicon_score("good").polarity;
        let negated = lexicon_score("not good").polarity;
        assert!((negated - plain * NEGATION_FACTOR).abs() < 1e-12);
        assert!(negated < 0.0);
    }

    #[test]
    fn negation_only_reaches_the_next_word() {
        // "not" applies to "sure", which is not in the lexicon.
        let score = lexicon_score("not sure but great").polarity;
        assert!((score - 0.4).abs() < 1e-12, "got {score}");
    }

    #[test]
    fn score_clamps_to_bounds() {
        let high = lexicon_score("great excellent best love masterpiece stunning perfect").polarity;
        assert_eq!(high, 1.0);
        let low = lexicon_score("terrible awful worst bootleg defective waste").polarity;
        assert_eq!(low, -1.0);
    }

    #[test]
    fn subjectivity_is_share_of_opinion_words() {
        let s = lexicon_score("great disc overall");
        assert!((s.subjectivity - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn punctuation_stripped_from_words() {
        let score = lexicon_score("Masterpiece!").polarity;
        assert!(score > 0.0, "expected positive score, got {score}");
    }
}
