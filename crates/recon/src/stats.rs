//! Outcome tallies for a reconciliation run.

use serde::Serialize;

use crate::model::MatchOutcome;

/// Counters over processed records. `total_count` always equals the sum of
/// the four category counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchStatistics {
    pub exact_count: usize,
    pub fuzzy_count: usize,
    pub existing_id_count: usize,
    pub unmatched_count: usize,
    pub total_count: usize,
    /// Confidence of every fuzzy match, in processing order.
    pub fuzzy_confidences: Vec<u8>,
}

impl MatchStatistics {
    /// Fold another partial tally into this one. Lets callers that split
    /// work per source combine per-worker partials.
    pub fn merge(&mut self, other: &MatchStatistics) {
        self.exact_count += other.exact_count;
        self.fuzzy_count += other.fuzzy_count;
        self.existing_id_count += other.existing_id_count;
        self.unmatched_count += other.unmatched_count;
        self.total_count += other.total_count;
        self.fuzzy_confidences.extend_from_slice(&other.fuzzy_confidences);
    }

    /// Average fuzzy confidence, None when no fuzzy match occurred.
    pub fn mean_fuzzy_confidence(&self) -> Option<f64> {
        if self.fuzzy_confidences.is_empty() {
            return None;
        }
        let sum: u64 = self.fuzzy_confidences.iter().map(|&c| u64::from(c)).sum();
        Some(sum as f64 / self.fuzzy_confidences.len() as f64)
    }
}

/// Explicit tally state threaded through a run. `snapshot` is valid at any
/// point, including mid-run.
#[derive(Debug, Default)]
pub struct StatisticsAggregator {
    stats: MatchStatistics,
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one outcome. Exactly one category moves per call.
    pub fn record(&mut self, outcome: &MatchOutcome) {
        match outcome {
            MatchOutcome::Exact { .. } => self.stats.exact_count += 1,
            MatchOutcome::Fuzzy { confidence, .. } => {
                self.stats.fuzzy_count += 1;
                self.stats.fuzzy_confidences.push(*confidence);
            }
            MatchOutcome::AlreadyHadId { .. } => self.stats.existing_id_count += 1,
            MatchOutcome::NoMatch => self.stats.unmatched_count += 1,
        }
        self.stats.total_count += 1;
    }

    pub fn snapshot(&self) -> MatchStatistics {
        self.stats.clone()
    }

    pub fn into_stats(self) -> MatchStatistics {
        self.stats
    }
}
