use serde::Serialize;

use crate::index::ConflictWarning;
use crate::report::ReportTable;
use crate::stats::MatchStatistics;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single row drawn from one source sheet.
///
/// `fields` carries every original column as (header, value) in header
/// order; the engine passes them through untouched.
#[derive(Debug, Clone)]
pub struct SourceRecord {
    pub source: String,
    pub row: usize,
    pub raw_name: String,
    pub existing_id: Option<String>,
    pub fields: Vec<(String, String)>,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Exactly one outcome per source record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Exact { employee_id: String },
    Fuzzy { employee_id: String, confidence: u8 },
    AlreadyHadId { employee_id: String },
    NoMatch,
}

impl MatchOutcome {
    /// The recovered ID, if any.
    pub fn matched_id(&self) -> Option<&str> {
        match self {
            Self::Exact { employee_id }
            | Self::Fuzzy { employee_id, .. }
            | Self::AlreadyHadId { employee_id } => Some(employee_id),
            Self::NoMatch => None,
        }
    }
}

/// Renders the stable Match_Status strings. These are a contract with
/// downstream spreadsheets; do not reword.
impl std::fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact { .. } => write!(f, "Exact match"),
            Self::Fuzzy { confidence, .. } => {
                write!(f, "Fuzzy match ({confidence}% confidence)")
            }
            Self::AlreadyHadId { .. } => write!(f, "Already had ID"),
            Self::NoMatch => write!(f, "No match found"),
        }
    }
}

// ---------------------------------------------------------------------------
// Enriched output
// ---------------------------------------------------------------------------

/// A source record after reconciliation, ready for report assembly.
/// Immutable once created.
#[derive(Debug, Clone)]
pub struct EnrichedRecord {
    pub source: String,
    pub fields: Vec<(String, String)>,
    pub original_id: Option<String>,
    pub matched_id: Option<String>,
    pub status: String,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub config_name: String,
    pub threshold: u8,
    pub engine_version: String,
    pub run_at: String,
}

/// The serializable whole-run result.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub meta: RunMeta,
    pub stats: MatchStatistics,
    pub warnings: Vec<ConflictWarning>,
    pub table: ReportTable,
}
