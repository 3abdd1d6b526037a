// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Post-Run Validation
//!
//! Invariant checks evaluated against target statistics after the load
//! stage. The domain evaluates; the application stage logs each result at
//! the level its severity dictates and fails the run on a critical failure.
//!
//! | Check | Severity |
//! |---|---|
//! | total row count | info |
//! | counts by status | info |
//! | counts by source (actives) | info |
//! | duplicate emails | warning |
//! | null email or name | warning |
//! | negative salary | warning |
//! | total > 0 with zero active rows | **critical** |
//!
//! Only the last is fatal; warnings are reportable but non-blocking, and the
//! reconciliation is never rolled back because of them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate statistics read from the target in one autocommit pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    /// Active row counts keyed by source tag.
    pub active_by_source: BTreeMap<String, u64>,
    /// Emails appearing more than once, in spite of the unique constraint.
    pub duplicate_emails: Vec<String>,
    pub null_email_or_name: u64,
    pub negative_salary: u64,
}

/// Severity of one validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckSeverity {
    Info,
    Warning,
    Critical,
}

/// Result of one validation check. Check names are static identifiers, so
/// the report serialises for the log sink but is never read back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub name: &'static str,
    pub severity: CheckSeverity,
    pub passed: bool,
    pub detail: String,
}

/// All check results for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub checks: Vec<CheckResult>,
}

impl ValidationReport {
    /// The failed critical check, when the run must be reported failed.
    pub fn critical_failure(&self) -> Option<&CheckResult> {
        self.checks
            .iter()
            .find(|check| check.severity == CheckSeverity::Critical && !check.passed)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks
            .iter()
            .filter(|check| check.severity == CheckSeverity::Warning && !check.passed)
    }
}

/// Evaluates the post-run check table against the target statistics.
pub fn evaluate(stats: &TargetStats) -> ValidationReport {
    let mut checks = Vec::with_capacity(7);

    checks.push(CheckResult {
        name: "total_rows",
        severity: CheckSeverity::Info,
        passed: true,
        detail: format!("total={}", stats.total),
    });

    checks.push(CheckResult {
        name: "status_distribution",
        severity: CheckSeverity::Info,
        passed: true,
        detail: format!("active={} inactive={}", stats.active, stats.inactive),
    });

    let by_source = stats
        .active_by_source
        .iter()
        .map(|(source, count)| format!("{}={}", source, count))
        .collect::<Vec<_>>()
        .join(" ");
    checks.push(CheckResult {
        name: "source_distribution",
        severity: CheckSeverity::Info,
        passed: true,
        detail: if by_source.is_empty() { "none".to_string() } else { by_source },
    });

    checks.push(CheckResult {
        name: "duplicate_emails",
        severity: CheckSeverity::Warning,
        passed: stats.duplicate_emails.is_empty(),
        detail: if stats.duplicate_emails.is_empty() {
            "none".to_string()
        } else {
            format!("{} duplicated: {}", stats.duplicate_emails.len(), stats.duplicate_emails.join(", "))
        },
    });

    checks.push(CheckResult {
        name: "null_email_or_name",
        severity: CheckSeverity::Warning,
        passed: stats.null_email_or_name == 0,
        detail: format!("count={}", stats.null_email_or_name),
    });

    checks.push(CheckResult {
        name: "negative_salary",
        severity: CheckSeverity::Warning,
        passed: stats.negative_salary == 0,
        detail: format!("count={}", stats.negative_salary),
    });

    checks.push(CheckResult {
        name: "active_rows_present",
        severity: CheckSeverity::Critical,
        passed: !(stats.total > 0 && stats.active == 0),
        detail: format!("total={} active={}", stats.total, stats.active),
    });

    ValidationReport { checks }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy_stats() -> TargetStats {
        let mut active_by_source = BTreeMap::new();
        active_by_source.insert("csv".to_string(), 2);
        active_by_source.insert("postgres".to_string(), 5);
        TargetStats {
            total: 10,
            active: 7,
            inactive: 3,
            active_by_source,
            duplicate_emails: Vec::new(),
            null_email_or_name: 0,
            negative_salary: 0,
        }
    }

    #[test]
    fn test_healthy_stats_pass_everything() {
        let report = evaluate(&healthy_stats());
        assert!(report.critical_failure().is_none());
        assert_eq!(report.warnings().count(), 0);
    }

    /// Zero active rows with a non-empty table is the one fatal condition.
    #[test]
    fn test_all_inactive_is_critical() {
        let mut stats = healthy_stats();
        stats.active = 0;
        stats.inactive = 10;
        let report = evaluate(&stats);
        let critical = report.critical_failure().unwrap();
        assert_eq!(critical.name, "active_rows_present");
    }

    #[test]
    fn test_empty_table_is_not_critical() {
        let stats = TargetStats::default();
        let report = evaluate(&stats);
        assert!(report.critical_failure().is_none());
    }

    #[test]
    fn test_warnings_are_non_blocking() {
        let mut stats = healthy_stats();
        stats.duplicate_emails = vec!["dup@x.org".to_string()];
        stats.negative_salary = 2;
        let report = evaluate(&stats);
        assert!(report.critical_failure().is_none());
        assert_eq!(report.warnings().count(), 2);
    }
}
