// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Unified Store Port
//!
//! Read/write contract against the unified target table. The port shapes the
//! transaction discipline the engine relies on:
//!
//! - [`UnifiedStore::snapshot`] — the comparator's baseline, read **before**
//!   any write of the run so soft-deletes never leak into the baseline
//! - [`UnifiedStore::retire`] — the deletion detector's single all-or-nothing
//!   transaction, touching only active rows
//! - [`UnifiedStore::apply_changes`] — the loader protocol: one session,
//!   inserts then updates, commits in batches, per-row error isolation;
//!   updates unconditionally set `status='active'` (reactivation) and never
//!   rewrite `email`, `source`, `source_id`, or `created_at`
//! - [`UnifiedStore::stats`] — the validator's autocommit read-only pass

use async_trait::async_trait;

use crate::entities::{LoadMetrics, UnifiedEmployee};
use crate::error::SyncError;
use crate::services::diff::ChangeSet;
use crate::services::validation::TargetStats;

/// The unified target table.
#[async_trait]
pub trait UnifiedStore: Send + Sync {
    /// Reads every row, regardless of status.
    async fn snapshot(&self) -> Result<Vec<UnifiedEmployee>, SyncError>;

    /// Applies the comparator's change set under the loader protocol and
    /// returns `(inserted, updated, errors)` counts. Row-level failures are
    /// absorbed and counted; only session-level failures error out.
    async fn apply_changes(&self, changes: &ChangeSet) -> Result<LoadMetrics, SyncError>;

    /// Flips the given emails to inactive and bumps `updated_at`, in one
    /// transaction. Only active rows are touched; returns the number of rows
    /// actually retired.
    async fn retire(&self, emails: &[String]) -> Result<u64, SyncError>;

    /// Aggregate statistics for the validator.
    async fn stats(&self) -> Result<TargetStats, SyncError>;
}
