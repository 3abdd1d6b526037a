// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Unified Target Store
//!
//! PostgreSQL adapter for the unified target table `employees_unified`.
//!
//! ## Loader Protocol
//!
//! [`apply_changes`](PostgresUnifiedStore::apply_changes) implements the
//! batched-write discipline the engine's partial-failure semantics depend
//! on:
//!
//! - one pooled connection for the whole stage, inserts first, then updates;
//! - commit every [`BATCH_SIZE`] row operations, and at end of stage;
//! - a failing row rolls back the current uncommitted batch, is logged with
//!   its email and counted as an error, and processing continues; the other
//!   rows of the rolled-back batch are replayed in a fresh transaction so a
//!   single poison row costs exactly one row;
//! - a session-level failure (connect, begin, commit) aborts the stage.
//!
//! Updates are keyed by email and unconditionally set `status='active'`, so
//! a soft-deleted record that reappears in a source is reactivated with its
//! fields refreshed. `email`, `source`, `source_id`, and `created_at` are
//! never rewritten by the update path.
//!
//! ## Transaction Discipline Elsewhere
//!
//! Retirement is one all-or-nothing transaction touching only active rows.
//! Snapshot and statistics reads run autocommit on the pool.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Acquire, Postgres, Row, Transaction};
use std::collections::BTreeMap;
use tracing::{info, warn};

use employee_sync_domain::entities::{EmployeeStatus, LoadMetrics, StagedEmployee, UnifiedEmployee};
use employee_sync_domain::repositories::UnifiedStore;
use employee_sync_domain::services::diff::ChangeSet;
use employee_sync_domain::services::validation::TargetStats;
use employee_sync_domain::value_objects::SourceKind;
use employee_sync_domain::SyncError;

use crate::infrastructure::config::DbSettings;

/// Commit granularity of the loader: small enough to bound the blast radius
/// of a poison row, large enough to amortise commit latency.
const BATCH_SIZE: usize = 10;

/// PostgreSQL-backed unified store.
pub struct PostgresUnifiedStore {
    pool: PgPool,
}

#[derive(Clone, Copy)]
enum RowOp<'a> {
    Insert(&'a StagedEmployee),
    Update(&'a StagedEmployee),
}

impl<'a> RowOp<'a> {
    fn record(&self) -> &'a StagedEmployee {
        match self {
            RowOp::Insert(record) | RowOp::Update(record) => record,
        }
    }
}

impl PostgresUnifiedStore {
    /// Builds a lazy pool against the target database. The target being
    /// unreachable is a hard failure, but it is the comparator's read — not
    /// process startup — that reports it.
    pub fn connect_lazy(settings: &DbSettings) -> Self {
        let options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .database(&settings.database)
            .username(&settings.user)
            .password(&settings.password)
            .options([("client_encoding", "UTF8")]);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy_with(options);

        Self { pool }
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the target table when absent. The unique constraint on email
    /// is what the comparator's index relies on.
    pub async fn ensure_schema(&self) -> Result<(), SyncError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS employees_unified (
                id          BIGSERIAL PRIMARY KEY,
                source      TEXT NOT NULL,
                source_id   TEXT,
                name        TEXT NOT NULL,
                email       TEXT NOT NULL UNIQUE,
                department  TEXT,
                salary      DOUBLE PRECISION,
                hire_date   DATE,
                status      TEXT NOT NULL DEFAULT 'active',
                created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| SyncError::database_error(format!("failed to create target table: {}", e)))?;

        Ok(())
    }

    async fn execute_op(tx: &mut Transaction<'_, Postgres>, op: RowOp<'_>) -> Result<(), sqlx::Error> {
        match op {
            RowOp::Insert(record) => {
                sqlx::query(
                    "INSERT INTO employees_unified \
                     (source, source_id, name, email, department, salary, hire_date, status, created_at, updated_at) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, 'active', now(), now())",
                )
                .bind(record.source.as_str())
                .bind(&record.source_id)
                .bind(&record.name)
                .bind(record.email.as_str())
                .bind(record.department.as_deref())
                .bind(record.salary)
                .bind(record.hire_date)
                .execute(&mut **tx)
                .await?;
            }
            RowOp::Update(record) => {
                sqlx::query(
                    "UPDATE employees_unified \
                     SET name = $1, department = $2, salary = $3, hire_date = $4, \
                         status = 'active', updated_at = now() \
                     WHERE email = $5",
                )
                .bind(&record.name)
                .bind(record.department.as_deref())
                .bind(record.salary)
                .bind(record.hire_date)
                .bind(record.email.as_str())
                .execute(&mut **tx)
                .await?;
            }
        }
        Ok(())
    }

    fn count_op(metrics: &mut LoadMetrics, op: RowOp<'_>) {
        match op {
            RowOp::Insert(_) => metrics.inserted += 1,
            RowOp::Update(_) => metrics.updated += 1,
        }
    }
}

#[async_trait]
impl UnifiedStore for PostgresUnifiedStore {
    async fn snapshot(&self) -> Result<Vec<UnifiedEmployee>, SyncError> {
        let rows = sqlx::query(
            "SELECT id, source, source_id, name, email, department, salary, hire_date, \
             status, created_at, updated_at FROM employees_unified ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| SyncError::database_error(format!("target snapshot read failed: {}", e)))?;

        let mut snapshot = Vec::with_capacity(rows.len());
        for row in &rows {
            let source_text: String = get(row, "source")?;
            let status_text: String = get(row, "status")?;
            snapshot.push(UnifiedEmployee {
                id: get(row, "id")?,
                source: source_text
                    .parse::<SourceKind>()
                    .map_err(|e| SyncError::database_error(format!("target row has bad source tag: {}", e)))?,
                source_id: get(row, "source_id")?,
                name: get::<Option<String>>(row, "name")?.unwrap_or_default(),
                email: get::<Option<String>>(row, "email")?.unwrap_or_default(),
                department: get(row, "department")?,
                salary: get(row, "salary")?,
                hire_date: get(row, "hire_date")?,
                status: status_text
                    .parse::<EmployeeStatus>()
                    .map_err(|e| SyncError::database_error(format!("target row has bad status: {}", e)))?,
                created_at: get(row, "created_at")?,
                updated_at: get(row, "updated_at")?,
            });
        }
        Ok(snapshot)
    }

    async fn apply_changes(&self, changes: &ChangeSet) -> Result<LoadMetrics, SyncError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| SyncError::database_error(format!("target session acquire failed: {}", e)))?;

        let ops: Vec<RowOp<'_>> = changes
            .inserts
            .iter()
            .map(RowOp::Insert)
            .chain(changes.updates.iter().map(RowOp::Update))
            .collect();

        let mut metrics = LoadMetrics::default();
        let mut pending: Vec<RowOp<'_>> = Vec::with_capacity(BATCH_SIZE);
        let mut tx = conn
            .begin()
            .await
            .map_err(|e| SyncError::database_error(format!("target begin failed: {}", e)))?;

        for op in ops {
            match Self::execute_op(&mut tx, op).await {
                Ok(()) => {
                    pending.push(op);
                    if pending.len() >= BATCH_SIZE {
                        tx.commit()
                            .await
                            .map_err(|e| SyncError::database_error(format!("target commit failed: {}", e)))?;
                        for committed in pending.drain(..) {
                            Self::count_op(&mut metrics, committed);
                        }
                        tx = conn
                            .begin()
                            .await
                            .map_err(|e| SyncError::database_error(format!("target begin failed: {}", e)))?;
                    }
                }
                Err(error) => {
                    // Row-level isolation: the poison row rolls the batch
                    // back; the batch's other rows are replayed so only the
                    // poison row is lost.
                    warn!(
                        email = op.record().email.as_str(),
                        error = %error,
                        "row failed, rolling back current batch"
                    );
                    metrics.errors += 1;
                    let _ = tx.rollback().await;

                    // Replay one row per transaction: a failed statement
                    // aborts its whole transaction on the server, so sharing
                    // one would poison the remaining replays.
                    for replay in pending.drain(..) {
                        let mut replay_tx = conn
                            .begin()
                            .await
                            .map_err(|e| SyncError::database_error(format!("target begin failed: {}", e)))?;
                        match Self::execute_op(&mut replay_tx, replay).await {
                            Ok(()) => {
                                replay_tx
                                    .commit()
                                    .await
                                    .map_err(|e| SyncError::database_error(format!("target commit failed: {}", e)))?;
                                Self::count_op(&mut metrics, replay);
                            }
                            Err(replay_error) => {
                                warn!(
                                    email = replay.record().email.as_str(),
                                    error = %replay_error,
                                    "row failed on replay"
                                );
                                metrics.errors += 1;
                                let _ = replay_tx.rollback().await;
                            }
                        }
                    }
                    tx = conn
                        .begin()
                        .await
                        .map_err(|e| SyncError::database_error(format!("target begin failed: {}", e)))?;
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| SyncError::database_error(format!("target commit failed: {}", e)))?;
        for committed in pending.drain(..) {
            Self::count_op(&mut metrics, committed);
        }

        info!(
            inserted = metrics.inserted,
            updated = metrics.updated,
            errors = metrics.errors,
            "load applied"
        );
        Ok(metrics)
    }

    async fn retire(&self, emails: &[String]) -> Result<u64, SyncError> {
        if emails.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SyncError::database_error(format!("retire begin failed: {}", e)))?;

        let result = sqlx::query(
            "UPDATE employees_unified SET status = 'inactive', updated_at = now() \
             WHERE status = 'active' AND email = ANY($1)",
        )
        .bind(emails)
        .execute(&mut *tx)
        .await
        .map_err(|e| SyncError::database_error(format!("retire update failed: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| SyncError::database_error(format!("retire commit failed: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn stats(&self) -> Result<TargetStats, SyncError> {
        let db_err = |e: sqlx::Error| SyncError::database_error(format!("target stats read failed: {}", e));

        let totals = sqlx::query(
            "SELECT COUNT(*) AS total, \
             COUNT(*) FILTER (WHERE status = 'active') AS active, \
             COUNT(*) FILTER (WHERE status = 'inactive') AS inactive, \
             COUNT(*) FILTER (WHERE email IS NULL OR email = '' OR name IS NULL OR name = '') AS null_email_or_name, \
             COUNT(*) FILTER (WHERE salary < 0) AS negative_salary \
             FROM employees_unified",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        let by_source_rows = sqlx::query(
            "SELECT source, COUNT(*) AS count FROM employees_unified \
             WHERE status = 'active' GROUP BY source ORDER BY source",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let duplicate_rows = sqlx::query(
            "SELECT email FROM employees_unified \
             GROUP BY email HAVING COUNT(*) > 1 ORDER BY email",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut active_by_source = BTreeMap::new();
        for row in &by_source_rows {
            let source: String = get(row, "source")?;
            let count: i64 = get(row, "count")?;
            active_by_source.insert(source, count.max(0) as u64);
        }

        let mut duplicate_emails = Vec::with_capacity(duplicate_rows.len());
        for row in &duplicate_rows {
            duplicate_emails.push(get::<String>(row, "email")?);
        }

        let total: i64 = get(&totals, "total")?;
        let active: i64 = get(&totals, "active")?;
        let inactive: i64 = get(&totals, "inactive")?;
        let null_email_or_name: i64 = get(&totals, "null_email_or_name")?;
        let negative_salary: i64 = get(&totals, "negative_salary")?;

        Ok(TargetStats {
            total: total.max(0) as u64,
            active: active.max(0) as u64,
            inactive: inactive.max(0) as u64,
            active_by_source,
            duplicate_emails,
            null_email_or_name: null_email_or_name.max(0) as u64,
            negative_salary: negative_salary.max(0) as u64,
        })
    }
}

fn get<'r, T>(row: &'r sqlx::postgres::PgRow, column: &str) -> Result<T, SyncError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(column)
        .map_err(|e| SyncError::database_error(format!("target column '{}' decode failed: {}", column, e)))
}
