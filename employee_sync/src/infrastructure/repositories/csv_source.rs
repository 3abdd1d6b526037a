// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CSV Source Adapter
//!
//! Extracts the file-source snapshot from a delimited UTF-8 file.
//!
//! ## Behaviour
//!
//! - The path is resolved from an ordered candidate list; first existing
//!   wins. No file at all is a source failure, not a schema failure.
//! - Encoding is strict UTF-8; a decode error aborts the stage.
//! - The header row defines field names. A file without a `name` or `email`
//!   header is a schema mismatch and aborts the whole run.
//! - Rows with a missing `email` or `name` **value** are kept here and
//!   dropped later by the transformer, so the drop counter has one owner.
//! - `source_id` comes from the `id` column, falling back to the 1-based row
//!   number when the column is absent or empty.
//!
//! The `last_updated` column is optional; the incremental window does not
//! apply to the file source — a file is always a full snapshot.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info};

use employee_sync_domain::repositories::{EmployeeSource, SnapshotWindow};
use employee_sync_domain::value_objects::{RawEmployee, RawValue, SourceKind};
use employee_sync_domain::SyncError;

/// File-source extractor.
pub struct CsvEmployeeSource {
    candidates: Vec<PathBuf>,
}

impl CsvEmployeeSource {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// First existing candidate path, or `None`.
    fn resolve_path(&self) -> Option<PathBuf> {
        self.candidates.iter().find(|path| path.exists()).cloned()
    }

    fn parse(content: &str) -> Result<Vec<RawEmployee>, SyncError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::None)
            .from_reader(content.as_bytes());

        // The one allowed string-keyed lookup: header name → column index.
        let headers = reader
            .headers()
            .map_err(|e| SyncError::extraction_failed(format!("csv header read failed: {}", e)))?;
        let columns: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(index, name)| (name.trim().to_lowercase(), index))
            .collect();

        for required in ["name", "email"] {
            if !columns.contains_key(required) {
                return Err(SyncError::schema_mismatch(format!(
                    "csv source is missing expected column '{}'",
                    required
                )));
            }
        }

        let field = |row: &csv::StringRecord, column: &str| -> RawValue {
            match columns.get(column).and_then(|&index| row.get(index)) {
                Some(value) if !value.is_empty() => RawValue::Text(value.to_string()),
                _ => RawValue::Null,
            }
        };

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                SyncError::extraction_failed(format!("csv row {} is malformed: {}", index + 1, e))
            })?;

            let source_id = match field(&record, "id") {
                RawValue::Text(id) => id,
                _ => (index + 1).to_string(),
            };

            let mut employee = RawEmployee::new(SourceKind::Csv, source_id);
            employee.name = field(&record, "name");
            employee.email = field(&record, "email");
            employee.department = field(&record, "department");
            employee.salary = field(&record, "salary");
            employee.hire_date = field(&record, "hire_date");
            employee.last_updated = field(&record, "last_updated");
            rows.push(employee);
        }

        Ok(rows)
    }
}

#[async_trait]
impl EmployeeSource for CsvEmployeeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Csv
    }

    async fn fetch_snapshot(&self, _window: Option<SnapshotWindow>) -> Result<Vec<RawEmployee>, SyncError> {
        let path = self.resolve_path().ok_or_else(|| {
            SyncError::source_unavailable(format!("no csv file found among candidates {:?}", self.candidates))
        })?;
        debug!(path = %path.display(), "csv source resolved");

        // Strict UTF-8: read bytes and decode explicitly so a bad byte is an
        // extraction failure, not silently replaced text.
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| SyncError::source_unavailable(format!("failed to read {}: {}", path.display(), e)))?;
        let content = std::str::from_utf8(&bytes).map_err(|e| {
            SyncError::extraction_failed(format!("{} is not valid UTF-8: {}", path.display(), e))
        })?;

        let rows = Self::parse(content)?;
        info!(rows = rows.len(), path = %path.display(), "csv snapshot extracted");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builds_raw_rows() {
        let content = "id,name,email,department,salary,hire_date\n\
                       1,Alice Ada,alice@x.org,Eng,50000,2020-01-01\n\
                       2,Bob,,Sales,40000,2019-06-01\n";
        let rows = CsvEmployeeSource::parse(content).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source_id, "1");
        assert_eq!(rows[0].email, RawValue::Text("alice@x.org".to_string()));
        // Missing email value is kept; the transformer drops it.
        assert_eq!(rows[1].email, RawValue::Null);
    }

    #[test]
    fn test_missing_required_header_is_schema_mismatch() {
        let content = "id,full_name,department\n1,Alice,Eng\n";
        let err = CsvEmployeeSource::parse(content).unwrap_err();
        assert!(matches!(err, SyncError::SchemaMismatch(_)));
    }

    #[test]
    fn test_missing_id_column_falls_back_to_row_number() {
        let content = "name,email\nAlice,a@x.org\nBob,b@x.org\n";
        let rows = CsvEmployeeSource::parse(content).unwrap();
        assert_eq!(rows[0].source_id, "1");
        assert_eq!(rows[1].source_id, "2");
    }

    #[test]
    fn test_headers_are_case_insensitive() {
        let content = "ID,Name,EMAIL\n7,Alice,a@x.org\n";
        let rows = CsvEmployeeSource::parse(content).unwrap();
        assert_eq!(rows[0].source_id, "7");
        assert_eq!(rows[0].name, RawValue::Text("Alice".to_string()));
    }
}
