// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Source Kind
//!
//! Identifies which of the three heterogeneous sources a record came from,
//! and fixes the concatenation order the transformer deduplicates in.
//!
//! ## Source Priority
//!
//! [`SourceKind::PRIORITY`] is the order snapshots are concatenated before
//! last-wins deduplication. Because the last occurrence of a business key is
//! kept, a later position in the array means higher authority:
//! PostgreSQL beats MySQL beats the CSV file. Reversing business priority
//! means reversing this array; nothing downstream changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SyncError;

/// Origin tag for an employee record.
///
/// Stored in the target table as lowercase text (`"csv"`, `"mysql"`,
/// `"postgres"`) and carried on every in-flight record so cross-source
/// provenance survives the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Delimited UTF-8 file source
    Csv,
    /// Row-oriented MySQL source database
    MySql,
    /// Row-oriented PostgreSQL source database
    Postgres,
}

impl SourceKind {
    /// Concatenation order for deduplication. Last entry wins ties.
    pub const PRIORITY: [SourceKind; 3] = [SourceKind::Csv, SourceKind::MySql, SourceKind::Postgres];

    /// Returns the lowercase wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Csv => "csv",
            SourceKind::MySql => "mysql",
            SourceKind::Postgres => "postgres",
        }
    }

    /// Position in the priority order; higher wins deduplication ties
    pub fn priority(&self) -> usize {
        Self::PRIORITY
            .iter()
            .position(|kind| kind == self)
            .unwrap_or(0)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" | "file" => Ok(SourceKind::Csv),
            "mysql" => Ok(SourceKind::MySql),
            "postgres" | "postgresql" => Ok(SourceKind::Postgres),
            other => Err(SyncError::internal_error(format!("unknown source kind: {}", other))),
        }
    }
}
