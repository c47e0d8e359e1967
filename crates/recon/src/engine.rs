use crate::config::{LookupConfig, ReconcileConfig, SourceConfig};
use crate::error::ReconError;
use crate::index::LookupIndex;
use crate::matcher::MatchEngine;
use crate::model::{EnrichedRecord, MatchResult, RunMeta, SourceRecord};
use crate::reconcile::reconcile_all;
use crate::report::assemble;
use crate::similarity::NameSimilarity;
use crate::stats::StatisticsAggregator;

/// Pre-loaded inputs for one run. Sources are in report order.
pub struct ReconcileInput {
    pub lookup: Vec<(String, String)>,
    pub sources: Vec<(String, Vec<SourceRecord>)>,
}

/// Run reconciliation per config. Returns the enriched table + statistics.
pub fn run(config: &ReconcileConfig, input: &ReconcileInput) -> Result<MatchResult, ReconError> {
    // The index build is the only failure that aborts before any
    // statistics exist.
    let index = LookupIndex::build(&input.lookup)?;
    let threshold = config.effective_threshold();
    let metric = NameSimilarity;
    let engine = MatchEngine::new(&index, &metric);

    let mut aggregator = StatisticsAggregator::new();
    let mut by_source: Vec<(String, Vec<EnrichedRecord>)> =
        Vec::with_capacity(input.sources.len());
    for (source_name, records) in &input.sources {
        let enriched = reconcile_all(records, &engine, threshold, &mut aggregator);
        by_source.push((source_name.clone(), enriched));
    }

    let table = assemble(&by_source);

    Ok(MatchResult {
        meta: RunMeta {
            config_name: config.name.clone(),
            threshold,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        stats: aggregator.into_stats(),
        warnings: index.conflicts().to_vec(),
        table,
    })
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

fn trimmed_headers(
    source_name: &str,
    reader: &mut csv::Reader<&[u8]>,
) -> Result<Vec<String>, ReconError> {
    // Exports pad headers with stray whitespace; trim before column
    // resolution. Cell values stay untouched.
    let headers = reader.headers().map_err(|e| {
        ReconError::Io(format!("{source_name}: {e}"))
    })?;
    Ok(headers.iter().map(|h| h.trim().to_string()).collect())
}

/// Load (raw name, employee ID) pairs from the canonical lookup CSV.
pub fn load_lookup_entries(
    csv_data: &str,
    config: &LookupConfig,
) -> Result<Vec<(String, String)>, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers = trimmed_headers("lookup", &mut reader)?;

    let name_idx = config
        .columns
        .name_candidates()
        .find_map(|candidate| headers.iter().position(|h| h == candidate))
        .ok_or_else(|| ReconError::MissingColumn {
            source: "lookup".into(),
            column: config.columns.name.clone(),
        })?;
    let id_idx = headers
        .iter()
        .position(|h| h == &config.columns.employee_id)
        .ok_or_else(|| ReconError::MissingColumn {
            source: "lookup".into(),
            column: config.columns.employee_id.clone(),
        })?;

    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;
        let name = record.get(name_idx).unwrap_or("").to_string();
        let id = record.get(id_idx).unwrap_or("").to_string();
        pairs.push((name, id));
    }
    Ok(pairs)
}

/// Load one source sheet. Every original column rides along in `fields`.
pub fn load_source_records(
    source_name: &str,
    csv_data: &str,
    config: &SourceConfig,
) -> Result<Vec<SourceRecord>, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers = trimmed_headers(source_name, &mut reader)?;

    let name_idx = config
        .columns
        .name_candidates()
        .find_map(|candidate| headers.iter().position(|h| h == candidate))
        .ok_or_else(|| ReconError::MissingColumn {
            source: source_name.into(),
            column: config.columns.name.clone(),
        })?;

    let employee_id_idx = match &config.columns.employee_id {
        Some(column) => Some(
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| ReconError::MissingColumn {
                    source: source_name.into(),
                    column: column.clone(),
                })?,
        ),
        None => None,
    };

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;

        let mut fields = Vec::with_capacity(headers.len());
        for (i, header) in headers.iter().enumerate() {
            fields.push((header.clone(), record.get(i).unwrap_or("").to_string()));
        }

        let existing_id = employee_id_idx.and_then(|i| {
            let value = record.get(i).unwrap_or("").trim();
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        });

        records.push(SourceRecord {
            source: source_name.to_string(),
            row: records.len(),
            raw_name: record.get(name_idx).unwrap_or("").to_string(),
            existing_id,
            fields,
        });
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
