//! Exact-then-fuzzy name matching against the lookup index.

use crate::index::LookupIndex;
use crate::model::MatchOutcome;
use crate::normalize::normalize;
use crate::similarity::SimilarityMetric;

pub const MIN_THRESHOLD: u8 = 60;
pub const MAX_THRESHOLD: u8 = 100;
pub const DEFAULT_THRESHOLD: u8 = 85;

/// Clamp a requested threshold into [MIN_THRESHOLD, MAX_THRESHOLD].
/// Out-of-range requests are clamped, never rejected.
pub fn clamp_threshold(requested: i64) -> u8 {
    requested.clamp(i64::from(MIN_THRESHOLD), i64::from(MAX_THRESHOLD)) as u8
}

/// Matches one query name at a time against a read-only index.
pub struct MatchEngine<'a> {
    index: &'a LookupIndex,
    metric: &'a dyn SimilarityMetric,
}

impl<'a> MatchEngine<'a> {
    pub fn new(index: &'a LookupIndex, metric: &'a dyn SimilarityMetric) -> Self {
        MatchEngine { index, metric }
    }

    /// Resolve `raw_name` to an outcome at `threshold` percent.
    ///
    /// Empty keys never match and never reach the metric. Exact hits skip
    /// scoring entirely. Otherwise every candidate key is scored and the
    /// best one wins; ties go to the shorter key, then the lexically
    /// smaller one.
    pub fn match_name(&self, raw_name: &str, threshold: u8) -> MatchOutcome {
        let threshold = threshold.clamp(MIN_THRESHOLD, MAX_THRESHOLD);
        let key = normalize(raw_name);
        if key.is_empty() {
            return MatchOutcome::NoMatch;
        }
        if let Some(id) = self.index.lookup_exact(&key) {
            return MatchOutcome::Exact { employee_id: id.to_string() };
        }

        let mut best: Option<(&str, u8)> = None;
        for candidate in self.index.all_keys() {
            let score = self.metric.score(&key, candidate);
            let better = match best {
                None => true,
                Some((best_key, best_score)) => {
                    score > best_score
                        || (score == best_score
                            && (candidate.len() < best_key.len()
                                || (candidate.len() == best_key.len()
                                    && candidate < best_key)))
                }
            };
            if better {
                best = Some((candidate, score));
            }
        }

        if let Some((best_key, best_score)) = best {
            if best_score >= threshold {
                // A conflicted key lands here even when the query text is
                // identical; it reports the first-seen ID as fuzzy.
                if let Some(id) = self.index.first_id(best_key) {
                    return MatchOutcome::Fuzzy {
                        employee_id: id.to_string(),
                        confidence: best_score,
                    };
                }
            }
        }
        MatchOutcome::NoMatch
    }
}
