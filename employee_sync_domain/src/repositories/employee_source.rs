// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Employee Source Port
//!
//! The extraction contract every source implements. A snapshot is
//! all-or-nothing: either the full row set comes back, or the call fails and
//! the coordinator applies the per-source trigger rule. Partial reads are
//! not permitted.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::SyncError;
use crate::value_objects::{RawEmployee, SourceKind};

/// Incremental extraction window: restrict to rows whose `last_updated` is
/// at or after `since`. An optimisation, not a correctness property — the
/// comparator remains correct on a full snapshot, and sources without a
/// `last_updated` column ignore the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotWindow {
    pub since: DateTime<Utc>,
}

impl SnapshotWindow {
    /// Window covering the last `days` days from now.
    pub fn last_days(days: i64) -> Self {
        Self {
            since: Utc::now() - Duration::days(days),
        }
    }
}

/// One of the three heterogeneous sources of employee records.
///
/// Implementations must be thread-safe: the coordinator pulls all sources
/// concurrently.
#[async_trait]
pub trait EmployeeSource: Send + Sync {
    /// Which source this is; stamped on every extracted row.
    fn kind(&self) -> SourceKind;

    /// Pulls the full snapshot for this run.
    ///
    /// Errors distinguish policy: [`SyncError::SchemaMismatch`] aborts the
    /// whole run; any other error marks this source failed for the run and
    /// contributes an empty snapshot.
    async fn fetch_snapshot(&self, window: Option<SnapshotWindow>) -> Result<Vec<RawEmployee>, SyncError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_covers_requested_days() {
        let window = SnapshotWindow::last_days(30);
        let age = Utc::now() - window.since;
        assert!(age >= Duration::days(30));
        assert!(age < Duration::days(31));
    }
}
