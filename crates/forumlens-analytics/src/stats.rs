//! Descriptive statistics shared by the aggregation stages.

use serde::{Deserialize, Serialize};

use forumlens_core::SentimentLabel;

#[allow(clippy::cast_precision_loss)]
fn len_f64(values: &[f64]) -> f64 {
    values.len() as f64
}

/// `num / den` as a float. Callers guarantee `den > 0`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn ratio(num: usize, den: usize) -> f64 {
    num as f64 / den as f64
}

/// Arithmetic mean; `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / len_f64(values))
}

/// Median (average of the two middle values for even lengths).
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Sample standard deviation (n - 1 denominator); `None` below two values.
#[must_use]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (len_f64(values) - 1.0)).sqrt())
}

/// Mean, median and spread of a set of polarities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarityStats {
    pub mean: f64,
    pub median: f64,
    pub std: Option<f64>,
}

impl PolarityStats {
    /// `None` when `values` is empty.
    #[must_use]
    pub fn of(values: &[f64]) -> Option<Self> {
        Some(Self {
            mean: mean(values)?,
            median: median(values)?,
            std: sample_std(values),
        })
    }
}

/// Share of each sentiment label, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentMix {
    pub pct_positive: f64,
    pub pct_neutral: f64,
    pub pct_negative: f64,
}

impl SentimentMix {
    /// Percentages over the labels seen; `None` when there are none.
    #[must_use]
    pub fn from_labels<I>(labels: I) -> Option<Self>
    where
        I: IntoIterator<Item = SentimentLabel>,
    {
        let (mut pos, mut neu, mut neg) = (0u32, 0u32, 0u32);
        for label in labels {
            match label {
                SentimentLabel::Positive => pos += 1,
                SentimentLabel::Neutral => neu += 1,
                SentimentLabel::Negative => neg += 1,
            }
        }
        let n = pos + neu + neg;
        if n == 0 {
            return None;
        }
        let total = f64::from(n);
        Some(Self {
            pct_positive: f64::from(pos) / total * 100.0,
            pct_neutral: f64::from(neu) / total * 100.0,
            pct_negative: f64::from(neg) / total * 100.0,
        })
    }
}
