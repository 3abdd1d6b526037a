// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Run Report
//!
//! Per-run metrics the coordinator fills in at each stage boundary and hands
//! back to the scheduler. One report per run; counters only, no row data.
//!
//! The report is what the exit status is derived from: a run is `Success`
//! iff every stage completed and the validator's critical check passed.
//! Everything else in here is observability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::services::validation::ValidationReport;
use crate::value_objects::SourceKind;

/// Outcome of one extractor's pull.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePull {
    pub source: SourceKind,
    /// Rows in the snapshot; zero when the pull failed.
    pub rows: usize,
    /// True when the extractor failed and contributed an empty snapshot.
    pub failed: bool,
    /// Human-readable failure detail, for the log and the scheduler.
    pub error: Option<String>,
}

/// Loader counters: rows landed and rows absorbed as row-level errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadMetrics {
    pub inserted: u64,
    pub updated: u64,
    pub errors: u64,
}

impl LoadMetrics {
    pub fn total_applied(&self) -> u64 {
        self.inserted + self.updated
    }
}

/// Final disposition of a run, surfaced to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Success,
    Failed,
}

/// Metrics for one end-to-end reconciliation run. Serialises outbound for
/// the log sink; never read back.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub pulls: Vec<SourcePull>,
    /// Rows after concatenation, before normalisation.
    pub extracted_total: usize,
    /// Rows dropped by the transformer (empty email/name).
    pub dropped: usize,
    /// Rows after normalisation and deduplication.
    pub staged: usize,
    /// Classification results from the comparator.
    pub planned_inserts: usize,
    pub planned_updates: usize,
    /// Rows the comparator skipped defensively (blank key).
    pub skipped: usize,
    /// Active rows flipped to inactive by the deletion detector.
    pub retired: u64,
    pub load: LoadMetrics,
    pub validation: Option<ValidationReport>,
    pub outcome: RunOutcome,
}

impl RunReport {
    /// Starts a new report stamped with the current time.
    pub fn begin() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pulls: Vec::new(),
            extracted_total: 0,
            dropped: 0,
            staged: 0,
            planned_inserts: 0,
            planned_updates: 0,
            skipped: 0,
            retired: 0,
            load: LoadMetrics::default(),
            validation: None,
            outcome: RunOutcome::Failed,
        }
    }

    /// Seals the report with the final outcome.
    pub fn finish(&mut self, outcome: RunOutcome) {
        self.finished_at = Some(Utc::now());
        self.outcome = outcome;
    }

    /// Wall-clock duration, when the run has finished.
    pub fn duration(&self) -> Option<Duration> {
        self.finished_at
            .map(|end| (end - self.started_at).to_std().unwrap_or_default())
    }

    /// True when at least one extractor failed this run.
    pub fn any_source_failed(&self) -> bool {
        self.pulls.iter().any(|pull| pull.failed)
    }

    pub fn is_success(&self) -> bool {
        self.outcome == RunOutcome::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lifecycle() {
        let mut report = RunReport::begin();
        assert!(report.finished_at.is_none());
        assert!(!report.is_success());

        report.finish(RunOutcome::Success);
        assert!(report.is_success());
        assert!(report.duration().is_some());
    }

    #[test]
    fn test_any_source_failed() {
        let mut report = RunReport::begin();
        report.pulls.push(SourcePull {
            source: SourceKind::Csv,
            rows: 10,
            failed: false,
            error: None,
        });
        assert!(!report.any_source_failed());

        report.pulls.push(SourcePull {
            source: SourceKind::MySql,
            rows: 0,
            failed: true,
            error: Some("connection refused".to_string()),
        });
        assert!(report.any_source_failed());
    }

    #[test]
    fn test_load_metrics_total() {
        let load = LoadMetrics {
            inserted: 3,
            updated: 4,
            errors: 1,
        };
        assert_eq!(load.total_applied(), 7);
    }
}
