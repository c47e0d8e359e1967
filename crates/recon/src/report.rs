//! Final table assembly across sources.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::EnrichedRecord;

/// Cell marker for a column a source never had. Distinct from the empty
/// string, which is a present-but-blank value.
pub const ABSENT_FIELD: &str = "N/A";

pub const SOURCE_COLUMN: &str = "Source";
pub const ORIGINAL_ID_COLUMN: &str = "Original_Employee_ID";
pub const MATCHED_ID_COLUMN: &str = "Matched_Employee_ID";
pub const STATUS_COLUMN: &str = "Match_Status";

/// Row-major output table. Header order is a contract: Source, the
/// original columns in first-seen order, then the three match columns.
#[derive(Debug, Clone, Serialize)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    /// Index of a header, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Merge per-source enriched records into one table.
///
/// Sources appear in slice order; rows keep their within-source order.
/// Original columns are unioned across all sources in first-seen order,
/// and a record missing a unioned column gets [`ABSENT_FIELD`] rather
/// than being dropped. Absent IDs render as empty cells, not
/// [`ABSENT_FIELD`].
pub fn assemble(records_by_source: &[(String, Vec<EnrichedRecord>)]) -> ReportTable {
    let mut union: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for (_, records) in records_by_source {
        for record in records {
            for (header, _) in &record.fields {
                if seen.insert(header) {
                    union.push(header.clone());
                }
            }
        }
    }

    let mut headers = Vec::with_capacity(union.len() + 4);
    headers.push(SOURCE_COLUMN.to_string());
    headers.extend(union.iter().cloned());
    headers.push(ORIGINAL_ID_COLUMN.to_string());
    headers.push(MATCHED_ID_COLUMN.to_string());
    headers.push(STATUS_COLUMN.to_string());

    let mut rows = Vec::new();
    for (source, records) in records_by_source {
        for record in records {
            let mut row = Vec::with_capacity(headers.len());
            row.push(source.clone());
            for column in &union {
                // First occurrence wins when a sheet repeats a header.
                let cell = record
                    .fields
                    .iter()
                    .find(|(header, _)| header == column)
                    .map(|(_, value)| value.clone())
                    .unwrap_or_else(|| ABSENT_FIELD.to_string());
                row.push(cell);
            }
            row.push(record.original_id.clone().unwrap_or_default());
            row.push(record.matched_id.clone().unwrap_or_default());
            row.push(record.status.clone());
            rows.push(row);
        }
    }

    ReportTable { headers, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enriched(source: &str, fields: &[(&str, &str)], status: &str) -> EnrichedRecord {
        EnrichedRecord {
            source: source.into(),
            fields: fields
                .iter()
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect(),
            original_id: None,
            matched_id: Some("E1".into()),
            status: status.into(),
        }
    }

    #[test]
    fn sources_concatenate_in_caller_order() {
        let helper = vec![
            enriched("helper", &[("Name", "A")], "Exact match"),
            enriched("helper", &[("Name", "B")], "No match found"),
        ];
        let inactive = vec![
            enriched("inactive", &[("Name", "C")], "Exact match"),
            enriched("inactive", &[("Name", "D")], "Exact match"),
            enriched("inactive", &[("Name", "E")], "Exact match"),
        ];
        let table = assemble(&[
            ("helper".to_string(), helper),
            ("inactive".to_string(), inactive),
        ]);
        assert_eq!(
            table.headers,
            vec![
                "Source",
                "Name",
                "Original_Employee_ID",
                "Matched_Employee_ID",
                "Match_Status"
            ]
        );
        assert_eq!(table.rows.len(), 5);
        let sources: Vec<&str> = table.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(sources, vec!["helper", "helper", "inactive", "inactive", "inactive"]);
        let names: Vec<&str> = table.rows.iter().map(|r| r[1].as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn differing_schemas_union_with_absent_marker() {
        let helper = vec![enriched(
            "helper",
            &[("Name", "A"), ("Region", "North")],
            "Exact match",
        )];
        let inactive = vec![enriched(
            "inactive",
            &[("Name", "B"), ("Termination Date", "2024-01-31")],
            "Exact match",
        )];
        let table = assemble(&[
            ("helper".to_string(), helper),
            ("inactive".to_string(), inactive),
        ]);
        assert_eq!(
            table.headers,
            vec![
                "Source",
                "Name",
                "Region",
                "Termination Date",
                "Original_Employee_ID",
                "Matched_Employee_ID",
                "Match_Status"
            ]
        );
        // helper row has no Termination Date; inactive row has no Region.
        assert_eq!(table.rows[0][3], ABSENT_FIELD);
        assert_eq!(table.rows[1][2], ABSENT_FIELD);
        assert_eq!(table.rows[1][3], "2024-01-31");
    }

    #[test]
    fn absent_ids_render_empty() {
        let mut record = enriched("helper", &[("Name", "A")], "No match found");
        record.matched_id = None;
        let table = assemble(&[("helper".to_string(), vec![record])]);
        let original = table.column(ORIGINAL_ID_COLUMN).unwrap();
        let matched = table.column(MATCHED_ID_COLUMN).unwrap();
        assert_eq!(table.rows[0][original], "");
        assert_eq!(table.rows[0][matched], "");
    }

    #[test]
    fn repeated_header_projects_first_value() {
        let record = enriched(
            "helper",
            &[("Name", "first"), ("Name", "second")],
            "Exact match",
        );
        let table = assemble(&[("helper".to_string(), vec![record])]);
        assert_eq!(table.headers.iter().filter(|h| *h == "Name").count(), 1);
        assert_eq!(table.rows[0][1], "first");
    }

    #[test]
    fn no_sources_still_yields_fixed_columns() {
        let table = assemble(&[]);
        assert_eq!(
            table.headers,
            vec!["Source", "Original_Employee_ID", "Matched_Employee_ID", "Match_Status"]
        );
        assert!(table.rows.is_empty());
    }
}
