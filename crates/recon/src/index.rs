//! Canonical name -> employee ID index.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ReconError;
use crate::normalize::normalize;

/// One usable row from the canonical lookup sheet.
#[derive(Debug, Clone)]
pub struct LookupEntry {
    pub key: String,
    pub employee_id: String,
    pub original_name: String,
}

/// A name key that maps to more than one distinct employee ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictWarning {
    pub key: String,
    pub original_name: String,
    /// Distinct IDs in first-seen order.
    pub employee_ids: Vec<String>,
}

/// Read-only index over the canonical lookup, keyed by normalized name.
///
/// BTreeMap keeps key iteration lexicographic, which the fuzzy tie-break
/// depends on. Conflicted keys answer `first_id` but never `lookup_exact`;
/// queries on them fall through to the fuzzy path.
#[derive(Debug)]
pub struct LookupIndex {
    entries: BTreeMap<String, Vec<LookupEntry>>,
    conflicts: Vec<ConflictWarning>,
}

impl LookupIndex {
    /// Build from (raw name, employee ID) pairs.
    ///
    /// Rows whose name normalizes to the empty key or whose ID is blank are
    /// skipped. Re-inserting an identical (key, ID) pair is a no-op; a key
    /// colliding across distinct IDs keeps every ID in first-seen order and
    /// records one [`ConflictWarning`]. Fails with
    /// [`ReconError::IndexUnavailable`] when nothing usable remains.
    pub fn build(pairs: &[(String, String)]) -> Result<Self, ReconError> {
        let mut entries: BTreeMap<String, Vec<LookupEntry>> = BTreeMap::new();
        let mut skipped = 0usize;
        for (raw_name, id) in pairs {
            let key = normalize(raw_name);
            let id = id.trim();
            if key.is_empty() || id.is_empty() {
                skipped += 1;
                continue;
            }
            let bucket = entries.entry(key.clone()).or_default();
            if bucket.iter().any(|e| e.employee_id == id) {
                continue;
            }
            bucket.push(LookupEntry {
                key,
                employee_id: id.to_string(),
                original_name: raw_name.trim().to_string(),
            });
        }
        if entries.is_empty() {
            return Err(ReconError::IndexUnavailable(format!(
                "no usable lookup entries ({skipped} row(s) skipped)"
            )));
        }
        let conflicts = entries
            .values()
            .filter(|bucket| bucket.len() > 1)
            .map(|bucket| ConflictWarning {
                key: bucket[0].key.clone(),
                original_name: bucket[0].original_name.clone(),
                employee_ids: bucket.iter().map(|e| e.employee_id.clone()).collect(),
            })
            .collect();
        Ok(LookupIndex { entries, conflicts })
    }

    /// ID for `key`, only when exactly one distinct ID holds it.
    pub fn lookup_exact(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(bucket) if bucket.len() == 1 => Some(bucket[0].employee_id.as_str()),
            _ => None,
        }
    }

    /// First-inserted ID for `key`, conflicted or not.
    pub fn first_id(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|bucket| bucket[0].employee_id.as_str())
    }

    /// All keys in lexicographic order.
    pub fn all_keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Conflicts found at build time, ordered by key.
    pub fn conflicts(&self) -> &[ConflictWarning] {
        &self.conflicts
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
