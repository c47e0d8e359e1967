//! `rostermatch-recon` — Employee identity reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded lookup pairs and source records,
//! returns an enriched table plus run statistics. File IO stops at the
//! CSV-string loaders; nothing here touches the filesystem or prints.

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod report;
pub mod similarity;
pub mod stats;

pub use config::ReconcileConfig;
pub use engine::{load_lookup_entries, load_source_records, run, ReconcileInput};
pub use error::ReconError;
pub use index::{ConflictWarning, LookupIndex};
pub use matcher::{MatchEngine, DEFAULT_THRESHOLD, MAX_THRESHOLD, MIN_THRESHOLD};
pub use model::{MatchOutcome, MatchResult, SourceRecord};
pub use normalize::normalize;
pub use reconcile::{reconcile, reconcile_all};
pub use similarity::{NameSimilarity, SimilarityMetric};
pub use stats::{MatchStatistics, StatisticsAggregator};
