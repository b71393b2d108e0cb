//! Search quality analysis over normalized results.
//!
//! Scores are already clamped by the sanitizer, so bucketing here only has
//! to cover `[0.0, 1.0]`. Every score lands in exactly one bucket:
//!
//! | Bucket | Range |
//! |--------|-------|
//! | high   | `score > 0.7` |
//! | medium | `0.4 <= score <= 0.7` |
//! | low    | `score < 0.4` |

use crate::types::{NormalizedRecord, QualityReport, ScoreDistribution};

/// Scores strictly above this are high quality.
pub const HIGH_QUALITY_THRESHOLD: f64 = 0.7;

/// Scores strictly below this are low quality.
pub const LOW_QUALITY_THRESHOLD: f64 = 0.4;

/// Quality bucket of a single result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreBucket {
    High,
    Medium,
    Low,
}

impl ScoreBucket {
    /// Classify a clamped score.
    pub fn classify(score: f64) -> Self {
        if score > HIGH_QUALITY_THRESHOLD {
            Self::High
        } else if score < LOW_QUALITY_THRESHOLD {
            Self::Low
        } else {
            Self::Medium
        }
    }
}

/// Compute score statistics for a record.
///
/// An empty record yields zero counts and an average of `0.0`; the
/// response time is always passed through unchanged.
pub fn analyze(record: &NormalizedRecord) -> QualityReport {
    let result_count = record.results.len();
    if result_count == 0 {
        return QualityReport {
            result_count: 0,
            average_score: 0.0,
            distribution: ScoreDistribution::default(),
            response_time: record.response_time,
        };
    }

    let mut distribution = ScoreDistribution::default();
    let mut total = 0.0;
    for result in &record.results {
        total += result.score;
        match ScoreBucket::classify(result.score) {
            ScoreBucket::High => distribution.high += 1,
            ScoreBucket::Medium => distribution.medium += 1,
            ScoreBucket::Low => distribution.low += 1,
        }
    }

    let average_score = total / result_count as f64;
    tracing::debug!(
        result_count,
        average_score,
        high = distribution.high,
        medium = distribution.medium,
        low = distribution.low,
        "analyzed search quality"
    );

    QualityReport {
        result_count,
        average_score,
        distribution,
        response_time: record.response_time,
    }
}
