// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Run Coordinator
//!
//! Owns one reconciliation run end to end: stage sequencing, inter-stage
//! payload passing, trigger rules, cancellation, and structured logging at
//! every stage boundary.
//!
//! ## Stage Graph
//!
//! ```text
//!   extract csv  ─┐
//!   extract mysql ┼──► transform ──► compare ──► retire ──► load ──► validate
//!   extract pg   ─┘
//! ```
//!
//! Extractors run concurrently; the transformer is the join barrier; the
//! stages after it are sequential. The payload between stages is a typed
//! value — snapshots, staged records, change sets — never a re-serialised
//! blob, so dates and numbers survive end to end.
//!
//! ## Trigger Rules
//!
//! - A source failing with a schema mismatch aborts the run.
//! - Any other extraction failure marks that source failed, contributes an
//!   empty snapshot, and the run continues: a single source outage does not
//!   block reconciliation of the other two. The known cost is over-deletion
//!   (the failed source's rows look absent); the optional
//!   `skip_retirement_on_source_failure` guard trades staleness for safety.
//! - The comparator reads the target snapshot **before** the detector
//!   writes; otherwise the detector's soft-deletes would surface in the
//!   baseline and cause spurious reactivations.
//! - The validator runs unconditionally after the write stages, and its
//!   critical check fails the run.
//!
//! ## Concurrency
//!
//! Two concurrent runs are forbidden: the coordinator holds a run lock and
//! refuses a second `run()` with `PipelineBusy`. Cancellation is honoured at
//! stage boundaries only.

use futures::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

use employee_sync_bootstrap::ShutdownFlag;
use employee_sync_domain::entities::{RunOutcome, RunReport, SourcePull, StagedEmployee};
use employee_sync_domain::repositories::{EmployeeSource, SnapshotWindow, UnifiedStore};
use employee_sync_domain::services::validation::CheckSeverity;
use employee_sync_domain::services::{diff, normalizer, validation};
use employee_sync_domain::value_objects::{RawEmployee, SourceKind};
use employee_sync_domain::SyncError;

/// Run-shaping options resolved from configuration and CLI flags.
#[derive(Debug, Clone, Default)]
pub struct CoordinatorOptions {
    /// Incremental extraction window in days; `None` pulls full snapshots.
    pub incremental_window_days: Option<i64>,
    /// Skip the retire stage when any extractor failed this run.
    pub skip_retirement_on_source_failure: bool,
}

/// Coordinates one reconciliation run across the sources and the target.
pub struct SyncCoordinator {
    sources: Vec<Arc<dyn EmployeeSource>>,
    store: Arc<dyn UnifiedStore>,
    options: CoordinatorOptions,
    shutdown: ShutdownFlag,
    running: AtomicBool,
}

impl SyncCoordinator {
    pub fn new(
        sources: Vec<Arc<dyn EmployeeSource>>,
        store: Arc<dyn UnifiedStore>,
        options: CoordinatorOptions,
        shutdown: ShutdownFlag,
    ) -> Self {
        Self {
            sources,
            store,
            options,
            shutdown,
            running: AtomicBool::new(false),
        }
    }

    /// Executes one run. Returns the run report on success; an error means
    /// the run is reported failed to the scheduler.
    pub async fn run(&self) -> Result<RunReport, SyncError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(SyncError::PipelineBusy("a reconciliation run is already in flight".to_string()));
        }
        let result = self.run_locked().await;
        self.running.store(false, Ordering::SeqCst);
        result
    }

    async fn run_locked(&self) -> Result<RunReport, SyncError> {
        let mut report = RunReport::begin();
        info!(window_days = ?self.options.incremental_window_days, "reconciliation run started");

        let staged = self.run_extract_and_transform(&mut report).await?;

        let write_result = self.run_write_stages(staged, &mut report).await;

        // The validator runs unconditionally — even after a failed write
        // stage it still reports target health. A cancelled run is the one
        // exception: it was abandoned, not completed.
        let validation_result = if matches!(write_result, Err(SyncError::Cancelled(_))) {
            Ok(())
        } else {
            self.run_validate_stage(&mut report).await
        };

        match (write_result, validation_result) {
            (Ok(()), Ok(())) => {
                report.finish(RunOutcome::Success);
                info!(
                    inserted = report.load.inserted,
                    updated = report.load.updated,
                    retired = report.retired,
                    errors = report.load.errors,
                    duration_ms = report.duration().map(|d| d.as_millis() as u64),
                    "reconciliation run succeeded"
                );
                Ok(report)
            }
            (Err(e), _) | (Ok(()), Err(e)) => {
                report.finish(RunOutcome::Failed);
                error!(error = %e, "reconciliation run failed");
                Err(e)
            }
        }
    }

    /// Stages 1–2: parallel extraction, then normalisation + deduplication.
    async fn run_extract_and_transform(&self, report: &mut RunReport) -> Result<Vec<StagedEmployee>, SyncError> {
        let window = self.options.incremental_window_days.map(SnapshotWindow::last_days);

        let pulls = join_all(self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            async move { (source.kind(), source.fetch_snapshot(window).await) }
        }))
        .await;

        let mut snapshots: Vec<(SourceKind, Vec<RawEmployee>)> = Vec::with_capacity(pulls.len());
        for (kind, result) in pulls {
            match result {
                Ok(rows) => {
                    report.pulls.push(SourcePull {
                        source: kind,
                        rows: rows.len(),
                        failed: false,
                        error: None,
                    });
                    snapshots.push((kind, rows));
                }
                Err(e) if e.is_fatal_for_run() => {
                    error!(source = kind.as_str(), error = %e, "extraction aborted the run");
                    return Err(e);
                }
                Err(e) => {
                    warn!(source = kind.as_str(), error = %e, "extraction failed, continuing with empty snapshot");
                    report.pulls.push(SourcePull {
                        source: kind,
                        rows: 0,
                        failed: true,
                        error: Some(e.to_string()),
                    });
                    snapshots.push((kind, Vec::new()));
                }
            }
        }

        self.check_cancelled()?;

        let concatenated = normalizer::concat_in_priority(snapshots);
        report.extracted_total = concatenated.len();

        let (normalized, dropped) = normalizer::normalize_snapshot(&concatenated);
        let staged = normalizer::dedupe_last_wins(normalized);
        report.dropped = dropped;
        report.staged = staged.len();

        info!(
            extracted = report.extracted_total,
            dropped = dropped,
            staged = staged.len(),
            "transform stage complete"
        );
        Ok(staged)
    }

    /// Stages 3–5: compare, retire, load. The baseline snapshot is read
    /// once, before any write of this run.
    async fn run_write_stages(&self, staged: Vec<StagedEmployee>, report: &mut RunReport) -> Result<(), SyncError> {
        self.check_cancelled()?;

        let snapshot = self.store.snapshot().await?;
        let retirees = diff::retirees(&snapshot, &staged);
        let baseline = diff::index_by_email(&snapshot);
        let (changes, skipped) = diff::classify(staged, &baseline);
        report.planned_inserts = changes.inserts.len();
        report.planned_updates = changes.updates.len();
        report.skipped = skipped;
        if skipped > 0 {
            warn!(skipped, "comparator skipped records with a blank business key");
        }
        info!(
            baseline = snapshot.len(),
            inserts = changes.inserts.len(),
            updates = changes.updates.len(),
            "compare stage complete"
        );

        self.check_cancelled()?;

        if self.options.skip_retirement_on_source_failure && report.any_source_failed() {
            warn!("skipping retirement: at least one extractor failed this run");
        } else {
            let retired = self.store.retire(&retirees).await?;
            report.retired = retired;
            info!(candidates = retirees.len(), retired, "retire stage complete");
        }

        self.check_cancelled()?;

        report.load = self.store.apply_changes(&changes).await?;
        info!(
            inserted = report.load.inserted,
            updated = report.load.updated,
            errors = report.load.errors,
            "load stage complete"
        );
        Ok(())
    }

    /// Stage 6: post-run invariant checks. Only the critical check fails the
    /// run; warnings and infos are logged and carried in the report.
    async fn run_validate_stage(&self, report: &mut RunReport) -> Result<(), SyncError> {
        let stats = self.store.stats().await?;
        let validation = validation::evaluate(&stats);

        for check in &validation.checks {
            match check.severity {
                CheckSeverity::Info => info!(check = check.name, detail = %check.detail, "validation"),
                CheckSeverity::Warning if !check.passed => {
                    warn!(check = check.name, detail = %check.detail, "validation warning")
                }
                CheckSeverity::Warning => info!(check = check.name, detail = %check.detail, "validation"),
                CheckSeverity::Critical if !check.passed => {
                    error!(check = check.name, detail = %check.detail, "critical validation failure")
                }
                CheckSeverity::Critical => info!(check = check.name, detail = %check.detail, "validation"),
            }
        }

        let critical = validation.critical_failure().cloned();
        report.validation = Some(validation);

        match critical {
            Some(check) => Err(SyncError::critical_invariant(format!("{}: {}", check.name, check.detail))),
            None => Ok(()),
        }
    }

    fn check_cancelled(&self) -> Result<(), SyncError> {
        if self.shutdown.is_requested() {
            warn!("run cancelled at stage boundary");
            Err(SyncError::Cancelled("shutdown requested".to_string()))
        } else {
            Ok(())
        }
    }
}
