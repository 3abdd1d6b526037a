// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Diff Classification
//!
//! The comparator and deletion-detector algorithms: a four-way set diff of
//! the staged snapshot against the target baseline.
//!
//! ## Classification
//!
//! For each staged record, looked up in the baseline by normalised email:
//!
//! - absent from the baseline → **insert**
//! - present with any watched field differing → **update**
//! - present and identical → no operation
//!
//! Watched fields: `name`, `department`, `salary` (within
//! [`SALARY_TOLERANCE`]), `hire_date` (both-absent is equal) — plus an
//! inactive baseline status, which forces an update so the loader's
//! unconditional `status='active'` reactivates the row.
//!
//! Baseline values are normalised before comparison, so rows loaded before a
//! normalisation rule changed still diff correctly instead of producing a
//! perpetual update.
//!
//! ## Deletion Detection
//!
//! [`retirees`] computes the emails active in the target but absent from the
//! staged snapshot. Already-inactive rows are never touched. Because the
//! staged snapshot drives both sides, a record cannot be retired and
//! re-inserted in the same run: absence means retire, presence means
//! insert or update.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::entities::{EmployeeStatus, StagedEmployee, UnifiedEmployee};

use super::normalizer;

/// Salary changes at or below this magnitude are noise, not updates.
pub const SALARY_TOLERANCE: f64 = 0.01;

/// The comparator's output: two disjoint operation sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub inserts: Vec<StagedEmployee>,
    pub updates: Vec<StagedEmployee>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inserts.len() + self.updates.len()
    }
}

/// Indexes a target snapshot by normalised email. Rows without a usable
/// email cannot be matched and are left out; the validator reports them.
pub fn index_by_email(snapshot: &[UnifiedEmployee]) -> HashMap<String, &UnifiedEmployee> {
    let mut index = HashMap::with_capacity(snapshot.len());
    for row in snapshot {
        let key = row.business_key();
        if !key.is_empty() {
            index.insert(key, row);
        }
    }
    index
}

/// Classifies staged records against the baseline index.
///
/// Returns the change set and the count of defensively skipped records
/// (blank business key — impossible after the transformer, but checked).
pub fn classify(
    staged: Vec<StagedEmployee>,
    baseline: &HashMap<String, &UnifiedEmployee>,
) -> (ChangeSet, usize) {
    let mut changes = ChangeSet::default();
    let mut skipped = 0;

    for record in staged {
        if record.email.as_str().is_empty() {
            skipped += 1;
            continue;
        }
        match baseline.get(record.email.as_str()) {
            None => changes.inserts.push(record),
            Some(existing) => {
                if needs_update(&record, existing) {
                    changes.updates.push(record);
                }
            }
        }
    }

    (changes, skipped)
}

/// Watched-field comparison between a staged record and its baseline row.
fn needs_update(staged: &StagedEmployee, existing: &UnifiedEmployee) -> bool {
    if existing.status == EmployeeStatus::Inactive {
        return true;
    }

    if staged.name != existing.name.trim() {
        return true;
    }

    let existing_department = existing
        .department
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(normalizer::title_case);
    if staged.department != existing_department {
        return true;
    }

    let existing_salary = existing.salary.unwrap_or(0.0);
    if (staged.salary_for_compare() - existing_salary).abs() > SALARY_TOLERANCE {
        return true;
    }

    staged.hire_date != existing.hire_date
}

/// Emails of active target rows absent from the staged snapshot: the
/// deletion detector's input, sorted for deterministic processing.
pub fn retirees(snapshot: &[UnifiedEmployee], staged: &[StagedEmployee]) -> Vec<String> {
    let observed: HashSet<&str> = staged.iter().map(|r| r.email.as_str()).collect();
    let mut absent: Vec<String> = snapshot
        .iter()
        .filter(|row| row.is_active())
        .map(|row| row.business_key())
        .filter(|key| !key.is_empty() && !observed.contains(key.as_str()))
        .collect();
    absent.sort();
    absent.dedup();
    absent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{EmailAddress, SourceKind};
    use chrono::{NaiveDate, Utc};

    fn staged(email: &str, name: &str, department: Option<&str>, salary: Option<f64>) -> StagedEmployee {
        StagedEmployee {
            source: SourceKind::MySql,
            source_id: "10".to_string(),
            name: name.to_string(),
            email: EmailAddress::new(email).unwrap(),
            department: department.map(str::to_string),
            salary,
            hire_date: None,
        }
    }

    fn existing(email: &str, name: &str, department: Option<&str>, salary: Option<f64>) -> UnifiedEmployee {
        UnifiedEmployee {
            id: 1,
            source: SourceKind::Csv,
            source_id: Some("1".to_string()),
            name: name.to_string(),
            email: email.to_string(),
            department: department.map(str::to_string),
            salary,
            hire_date: None,
            status: EmployeeStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_unknown_email_classifies_as_insert() {
        let baseline_rows: Vec<UnifiedEmployee> = vec![];
        let baseline = index_by_email(&baseline_rows);
        let (changes, skipped) = classify(vec![staged("new@x.org", "New", None, None)], &baseline);
        assert_eq!(changes.inserts.len(), 1);
        assert!(changes.updates.is_empty());
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_identical_record_produces_no_operation() {
        let rows = vec![existing("a@x.org", "Alice", Some("Eng"), Some(50000.0))];
        let baseline = index_by_email(&rows);
        let (changes, _) = classify(vec![staged("a@x.org", "Alice", Some("Eng"), Some(50000.0))], &baseline);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_changed_watched_field_classifies_as_update() {
        let rows = vec![existing("a@x.org", "Alice", Some("Eng"), Some(50000.0))];
        let baseline = index_by_email(&rows);
        let (changes, _) = classify(vec![staged("a@x.org", "Alice", Some("Ops"), Some(50000.0))], &baseline);
        assert_eq!(changes.updates.len(), 1);
        assert!(changes.inserts.is_empty());
    }

    /// Salary drift within the tolerance is noise; beyond it is an update.
    #[test]
    fn test_salary_tolerance() {
        let rows = vec![existing("a@x.org", "Alice", None, Some(50000.0))];
        let baseline = index_by_email(&rows);

        let (within, _) = classify(vec![staged("a@x.org", "Alice", None, Some(50000.005))], &baseline);
        assert!(within.is_empty());

        let (beyond, _) = classify(vec![staged("a@x.org", "Alice", None, Some(50000.02))], &baseline);
        assert_eq!(beyond.updates.len(), 1);
    }

    #[test]
    fn test_absent_salary_compares_as_zero() {
        let rows = vec![existing("a@x.org", "Alice", None, None)];
        let baseline = index_by_email(&rows);
        let (changes, _) = classify(vec![staged("a@x.org", "Alice", None, Some(0.0))], &baseline);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_inactive_row_forces_reactivating_update() {
        let mut row = existing("a@x.org", "Alice", None, None);
        row.status = EmployeeStatus::Inactive;
        let rows = vec![row];
        let baseline = index_by_email(&rows);
        let (changes, _) = classify(vec![staged("a@x.org", "Alice", None, None)], &baseline);
        assert_eq!(changes.updates.len(), 1);
    }

    #[test]
    fn test_hire_date_both_absent_is_equal() {
        let rows = vec![existing("a@x.org", "Alice", None, None)];
        let baseline = index_by_email(&rows);
        let (changes, _) = classify(vec![staged("a@x.org", "Alice", None, None)], &baseline);
        assert!(changes.is_empty());

        let mut with_date = staged("a@x.org", "Alice", None, None);
        with_date.hire_date = NaiveDate::from_ymd_opt(2019, 6, 1);
        let (changes, _) = classify(vec![with_date], &baseline);
        assert_eq!(changes.updates.len(), 1);
    }

    /// Baseline rows that predate a normalisation rule must not produce a
    /// perpetual update: comparison normalises the stored value first.
    #[test]
    fn test_unnormalized_baseline_department_still_matches() {
        let rows = vec![existing("a@x.org", "Alice", Some("  engineering "), Some(0.0))];
        let baseline = index_by_email(&rows);
        let (changes, _) = classify(vec![staged("a@x.org", "Alice", Some("Engineering"), None)], &baseline);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_retirees_only_considers_active_rows() {
        let mut inactive = existing("gone@x.org", "Gone", None, None);
        inactive.status = EmployeeStatus::Inactive;
        let snapshot = vec![
            existing("stay@x.org", "Stay", None, None),
            existing("drop@x.org", "Drop", None, None),
            inactive,
        ];
        let observed = vec![staged("stay@x.org", "Stay", None, None)];

        let absent = retirees(&snapshot, &observed);
        assert_eq!(absent, vec!["drop@x.org".to_string()]);
    }

    #[test]
    fn test_retirees_empty_snapshot_retires_everything_active() {
        let snapshot = vec![existing("a@x.org", "A", None, None), existing("b@x.org", "B", None, None)];
        let absent = retirees(&snapshot, &[]);
        assert_eq!(absent, vec!["a@x.org".to_string(), "b@x.org".to_string()]);
    }
}
