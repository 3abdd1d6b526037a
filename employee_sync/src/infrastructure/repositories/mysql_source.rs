// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # MySQL Source Adapter
//!
//! Extracts the MySQL source snapshot over a `sqlx` pool.
//!
//! The session character set is forced to `utf8mb4`; historically this
//! source has carried double-UTF-8 corrupted text, which the transformer's
//! encoding repair handles downstream. `salary` is cast to `DOUBLE` on the
//! wire so every source presents the same numeric shape.
//!
//! The incremental window restricts to rows whose `last_updated` falls
//! within the window; this is an optimisation only, and the comparator is
//! correct on a full snapshot.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::Row;
use tracing::info;

use employee_sync_domain::repositories::{EmployeeSource, SnapshotWindow};
use employee_sync_domain::value_objects::{RawEmployee, RawValue, SourceKind};
use employee_sync_domain::SyncError;

use crate::infrastructure::config::DbSettings;

/// MySQL source extractor.
pub struct MySqlEmployeeSource {
    pool: MySqlPool,
    table: String,
}

impl MySqlEmployeeSource {
    /// Builds a lazy pool with the session charset forced to utf8mb4.
    ///
    /// Connection errors surface on first use, inside the extraction stage,
    /// where the coordinator's trigger rules can absorb them.
    pub fn connect_lazy(settings: &DbSettings) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .database(&settings.database)
            .username(&settings.user)
            .password(&settings.password)
            .charset("utf8mb4");

        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .connect_lazy_with(options);

        Self {
            pool,
            table: settings.table.clone(),
        }
    }

    pub fn from_pool(pool: MySqlPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }
}

#[async_trait]
impl EmployeeSource for MySqlEmployeeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::MySql
    }

    async fn fetch_snapshot(&self, window: Option<SnapshotWindow>) -> Result<Vec<RawEmployee>, SyncError> {
        let base = format!(
            "SELECT id, name, email, department, CAST(salary AS DOUBLE) AS salary, hire_date, last_updated \
             FROM {}",
            self.table
        );

        let rows = match window {
            Some(window) => {
                let query = format!("{} WHERE last_updated >= ? ORDER BY id", base);
                sqlx::query(&query)
                    .bind(window.since.naive_utc())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let query = format!("{} ORDER BY id", base);
                sqlx::query(&query).fetch_all(&self.pool).await
            }
        }
        .map_err(|e| classify_fetch_error("mysql", e))?;

        let mut snapshot = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: i64 = row
                .try_get("id")
                .map_err(|e| classify_fetch_error("mysql", e))?;

            let mut employee = RawEmployee::new(SourceKind::MySql, id.to_string());
            employee.name = text_field(row, "name")?;
            employee.email = text_field(row, "email")?;
            employee.department = text_field(row, "department")?;
            employee.salary = RawValue::from_option(
                row.try_get::<Option<f64>, _>("salary")
                    .map_err(|e| classify_fetch_error("mysql", e))?,
                RawValue::Float,
            );
            employee.hire_date = RawValue::from_option(
                row.try_get::<Option<chrono::NaiveDate>, _>("hire_date")
                    .map_err(|e| classify_fetch_error("mysql", e))?,
                RawValue::Date,
            );
            employee.last_updated = RawValue::from_option(
                row.try_get::<Option<chrono::NaiveDateTime>, _>("last_updated")
                    .map_err(|e| classify_fetch_error("mysql", e))?,
                RawValue::Timestamp,
            );
            snapshot.push(employee);
        }

        info!(rows = snapshot.len(), table = %self.table, "mysql snapshot extracted");
        Ok(snapshot)
    }
}

fn text_field(row: &sqlx::mysql::MySqlRow, column: &str) -> Result<RawValue, SyncError> {
    let value = row
        .try_get::<Option<String>, _>(column)
        .map_err(|e| classify_fetch_error("mysql", e))?;
    Ok(RawValue::from_option(value, RawValue::Text))
}

/// Maps a sqlx failure to the extraction taxonomy: a missing column is a
/// schema mismatch (aborts the run), anything else marks the source failed.
pub(crate) fn classify_fetch_error(source: &str, error: sqlx::Error) -> SyncError {
    match &error {
        sqlx::Error::ColumnNotFound(column) => {
            SyncError::schema_mismatch(format!("{} source is missing expected column '{}'", source, column))
        }
        sqlx::Error::Database(db) => {
            let message = db.message().to_lowercase();
            if message.contains("unknown column") || message.contains("does not exist") {
                SyncError::schema_mismatch(format!("{} source schema mismatch: {}", source, db.message()))
            } else {
                SyncError::source_unavailable(format!("{} source query failed: {}", source, db.message()))
            }
        }
        _ => SyncError::source_unavailable(format!("{} source query failed: {}", source, error)),
    }
}
