//! Config-driven reconciliation runs.
//!
//! `cmd_run` loads the lookup and every source CSV named by the config
//! (paths resolve relative to the config file), hands them to the engine,
//! and writes the report artifacts. `cmd_validate` stops after validation.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rostermatch_recon::matcher::clamp_threshold;
use rostermatch_recon::report::{ReportTable, STATUS_COLUMN};
use rostermatch_recon::{
    load_lookup_entries, load_source_records, run, MatchOutcome, MatchResult, ReconError,
    ReconcileConfig, ReconcileInput,
};

use crate::util::output_file_name;
use crate::CliError;

pub(crate) fn cmd_run(
    config_path: PathBuf,
    threshold: Option<i64>,
    output: Option<PathBuf>,
    unmatched: Option<PathBuf>,
    json: bool,
    fail_on_unmatched: bool,
) -> Result<(), CliError> {
    let csv_to_stdout = output.as_deref() == Some(Path::new("-"));
    if json && csv_to_stdout {
        return Err(
            CliError::args("--json and --output - would interleave on stdout")
                .with_hint("send the CSV to a file: --output report.csv --json"),
        );
    }

    let mut config = load_config(&config_path)?;
    if let Some(requested) = threshold {
        let clamped = clamp_threshold(requested);
        if i64::from(clamped) != requested {
            eprintln!("note: threshold {} out of range, using {}", requested, clamped);
        }
        config.threshold = requested;
    }

    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let input = load_run_input(base_dir, &config)?;
    let result = run(&config, &input).map_err(run_error)?;

    let report_bytes = table_to_csv(&result.table, None)?;
    if csv_to_stdout {
        io::stdout()
            .write_all(&report_bytes)
            .map_err(|e| CliError::runtime(e.to_string()))?;
    } else {
        let path = output.unwrap_or_else(|| PathBuf::from(default_report_name(&config)));
        fs::write(&path, &report_bytes)
            .map_err(|e| CliError::runtime(format!("{}: {}", path.display(), e)))?;
        eprintln!("wrote {}", path.display());
    }

    if let Some(path) = unmatched {
        let indices = unmatched_row_indices(&result.table)?;
        let bytes = table_to_csv(&result.table, Some(&indices))?;
        fs::write(&path, &bytes)
            .map_err(|e| CliError::runtime(format!("{}: {}", path.display(), e)))?;
        eprintln!("wrote {} ({} unmatched row(s))", path.display(), indices.len());
    }

    if json {
        let text = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::internal(e.to_string()))?;
        println!("{}", text);
    }

    print_summary(&result);

    if fail_on_unmatched && result.stats.unmatched_count > 0 {
        return Err(CliError::unmatched(format!(
            "{} row(s) had no match",
            result.stats.unmatched_count
        )));
    }

    Ok(())
}

pub(crate) fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    println!(
        "valid: {} ({} source(s), lookup {}, threshold {})",
        config.name,
        config.sources.len(),
        config.lookup.file,
        config.effective_threshold()
    );
    Ok(())
}

fn load_config(path: &Path) -> Result<ReconcileConfig, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::runtime(format!("{}: {}", path.display(), e)))?;
    ReconcileConfig::from_toml(&text).map_err(|e| CliError::config(e.to_string()))
}

fn load_run_input(base_dir: &Path, config: &ReconcileConfig) -> Result<ReconcileInput, CliError> {
    let lookup_text = read_text(&base_dir.join(&config.lookup.file))?;
    let lookup = load_lookup_entries(&lookup_text, &config.lookup)
        .map_err(|e| CliError::runtime(e.to_string()))?;

    let mut sources = Vec::with_capacity(config.sources.len());
    for source in &config.sources {
        let text = read_text(&base_dir.join(&source.file))?;
        let records = load_source_records(&source.name, &text, source)
            .map_err(|e| CliError::runtime(e.to_string()))?;
        sources.push((source.name.clone(), records));
    }

    Ok(ReconcileInput { lookup, sources })
}

fn read_text(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|e| CliError::runtime(format!("{}: {}", path.display(), e)))
}

fn run_error(err: ReconError) -> CliError {
    let message = err.to_string();
    match err {
        ReconError::IndexUnavailable(_) => CliError::no_index(message)
            .with_hint("the lookup CSV needs at least one row with both a name and an employee ID"),
        _ => CliError::runtime(message),
    }
}

fn default_report_name(config: &ReconcileConfig) -> String {
    let prefix = config.output.prefix.as_deref().unwrap_or(config.name.as_str());
    output_file_name(prefix, "csv", chrono::Local::now().naive_local())
}

fn table_to_csv(table: &ReportTable, row_filter: Option<&[usize]>) -> Result<Vec<u8>, CliError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&table.headers)
        .map_err(|e| CliError::runtime(e.to_string()))?;
    match row_filter {
        Some(indices) => {
            for &i in indices {
                writer
                    .write_record(&table.rows[i])
                    .map_err(|e| CliError::runtime(e.to_string()))?;
            }
        }
        None => {
            for row in &table.rows {
                writer
                    .write_record(row)
                    .map_err(|e| CliError::runtime(e.to_string()))?;
            }
        }
    }
    writer.into_inner().map_err(|e| CliError::runtime(e.to_string()))
}

fn unmatched_row_indices(table: &ReportTable) -> Result<Vec<usize>, CliError> {
    let status_col = table
        .column(STATUS_COLUMN)
        .ok_or_else(|| CliError::internal("report table has no Match_Status column"))?;
    let no_match = MatchOutcome::NoMatch.to_string();
    Ok(table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.get(status_col).map(String::as_str) == Some(no_match.as_str()))
        .map(|(i, _)| i)
        .collect())
}

fn print_summary(result: &MatchResult) {
    let stats = &result.stats;
    eprintln!(
        "{} row(s): {} exact, {} fuzzy, {} already had IDs, {} unmatched",
        stats.total_count,
        stats.exact_count,
        stats.fuzzy_count,
        stats.existing_id_count,
        stats.unmatched_count
    );
    if let Some(mean) = stats.mean_fuzzy_confidence() {
        eprintln!("mean fuzzy confidence: {:.1}%", mean);
    }
    for warning in &result.warnings {
        eprintln!(
            "warning: lookup name {:?} carries {} employee IDs ({})",
            warning.original_name,
            warning.employee_ids.len(),
            warning.employee_ids.join(", ")
        );
    }
}
