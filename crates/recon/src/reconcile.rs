//! Per-record reconciliation: keep an existing ID or ask the match engine.

use crate::matcher::MatchEngine;
use crate::model::{EnrichedRecord, MatchOutcome, SourceRecord};
use crate::stats::StatisticsAggregator;

/// Reconcile one record.
///
/// A non-blank existing ID is authoritative: the outcome is
/// `AlreadyHadId` and the engine is never consulted. All original fields
/// pass through unchanged and in order.
pub fn reconcile(
    record: &SourceRecord,
    engine: &MatchEngine<'_>,
    threshold: u8,
) -> (EnrichedRecord, MatchOutcome) {
    let existing = record
        .existing_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let outcome = match existing {
        Some(id) => MatchOutcome::AlreadyHadId { employee_id: id.to_string() },
        None => engine.match_name(&record.raw_name, threshold),
    };
    let enriched = EnrichedRecord {
        source: record.source.clone(),
        fields: record.fields.clone(),
        original_id: existing.map(str::to_string),
        matched_id: outcome.matched_id().map(str::to_string),
        status: outcome.to_string(),
    };
    (enriched, outcome)
}

/// Reconcile a whole source in input order, tallying every outcome.
pub fn reconcile_all(
    records: &[SourceRecord],
    engine: &MatchEngine<'_>,
    threshold: u8,
    stats: &mut StatisticsAggregator,
) -> Vec<EnrichedRecord> {
    let mut enriched = Vec::with_capacity(records.len());
    for record in records {
        let (rec, outcome) = reconcile(record, engine, threshold);
        stats.record(&outcome);
        enriched.push(rec);
    }
    enriched
}
