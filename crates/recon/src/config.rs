use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ReconError;
use crate::matcher::{clamp_threshold, DEFAULT_THRESHOLD};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ReconcileConfig {
    pub name: String,
    /// Fuzzy acceptance percentage. Any integer deserializes;
    /// `effective_threshold` clamps it instead of rejecting.
    #[serde(default = "default_threshold")]
    pub threshold: i64,
    pub lookup: LookupConfig,
    /// Array of tables; file order is report order.
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_threshold() -> i64 {
    i64::from(DEFAULT_THRESHOLD)
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    pub file: String,
    pub columns: LookupColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LookupColumns {
    pub name: String,
    /// Tried in order when `name` is absent from the header row.
    #[serde(default)]
    pub name_fallbacks: Vec<String>,
    pub employee_id: String,
}

impl LookupColumns {
    pub fn name_candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.name_fallbacks.iter().map(String::as_str))
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub file: String,
    pub columns: SourceColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceColumns {
    pub name: String,
    #[serde(default)]
    pub name_fallbacks: Vec<String>,
    /// Optional; a source without an ID column sends every row to matching.
    #[serde(default)]
    pub employee_id: Option<String>,
}

impl SourceColumns {
    pub fn name_candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.name_fallbacks.iter().map(String::as_str))
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Artifact filename prefix; a slug of the config name when unset.
    #[serde(default)]
    pub prefix: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconcileConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconcileConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.sources.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one [[sources]] entry is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "source names must not be empty".into(),
                ));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(ReconError::ConfigValidation(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }
        }
        Ok(())
    }

    pub fn effective_threshold(&self) -> u8 {
        clamp_threshold(self.threshold)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
