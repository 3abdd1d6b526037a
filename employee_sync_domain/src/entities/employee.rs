// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Employee Records
//!
//! The two record shapes the pipeline is built around:
//!
//! - [`StagedEmployee`] — an in-flight record between the transformer and the
//!   loader: normalised, deduplicated, carrying a validated business key.
//! - [`UnifiedEmployee`] — a row of the unified target table as read back for
//!   the comparator's baseline and the validator's checks.
//!
//! ## Lifecycle
//!
//! A record is created by the loader's insert path on first observation,
//! mutated by the update path when any watched field differs, flipped to
//! [`EmployeeStatus::Inactive`] by the deletion detector when absent from all
//! sources, and flipped back to active (with fields refreshed) by the update
//! path when observed again.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SyncError;
use crate::value_objects::{EmailAddress, SourceKind};

/// Row status in the unified table. Soft deletion flips this flag; rows are
/// never physically removed by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    Active,
    Inactive,
}

impl EmployeeStatus {
    /// Lowercase wire text, matching the target column values.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(EmployeeStatus::Active),
            "inactive" => Ok(EmployeeStatus::Inactive),
            other => Err(SyncError::internal_error(format!("unknown employee status: {}", other))),
        }
    }
}

/// A normalised, deduplicated record in flight between stages.
///
/// Same field list as [`UnifiedEmployee`] minus the store-assigned surrogate
/// id, status, and timestamps — those belong to the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedEmployee {
    pub source: SourceKind,
    pub source_id: String,
    pub name: String,
    pub email: EmailAddress,
    pub department: Option<String>,
    pub salary: Option<f64>,
    pub hire_date: Option<NaiveDate>,
}

impl StagedEmployee {
    /// Salary as the comparator sees it: absent compares as zero.
    pub fn salary_for_compare(&self) -> f64 {
        self.salary.unwrap_or(0.0)
    }
}

/// A row of the unified target table.
///
/// `email` and `name` are plain strings here rather than validated value
/// objects: the snapshot must represent every row the store holds, including
/// pre-existing rows that violate the invariants the validator reports on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedEmployee {
    pub id: i64,
    pub source: SourceKind,
    pub source_id: Option<String>,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub salary: Option<f64>,
    pub hire_date: Option<NaiveDate>,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UnifiedEmployee {
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    /// The normalised business key of this row, used for the comparator's
    /// index. Empty when the row has no usable email.
    pub fn business_key(&self) -> String {
        EmailAddress::normalize(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_text() {
        assert_eq!(EmployeeStatus::Active.as_str(), "active");
        assert_eq!(EmployeeStatus::Inactive.as_str(), "inactive");
        assert_eq!("INACTIVE".parse::<EmployeeStatus>().unwrap(), EmployeeStatus::Inactive);
        assert!("deleted".parse::<EmployeeStatus>().is_err());
    }

    #[test]
    fn test_absent_salary_compares_as_zero() {
        let staged = StagedEmployee {
            source: SourceKind::Csv,
            source_id: "1".to_string(),
            name: "Alice Ada".to_string(),
            email: EmailAddress::new("alice@x").unwrap(),
            department: None,
            salary: None,
            hire_date: None,
        };
        assert_eq!(staged.salary_for_compare(), 0.0);
    }

    #[test]
    fn test_business_key_normalizes_stored_email() {
        let row = UnifiedEmployee {
            id: 1,
            source: SourceKind::MySql,
            source_id: Some("7".to_string()),
            name: "Bob".to_string(),
            email: " Bob@X.Org ".to_string(),
            department: None,
            salary: Some(100.0),
            hire_date: None,
            status: EmployeeStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(row.business_key(), "bob@x.org");
    }
}
