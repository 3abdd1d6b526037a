// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # PostgreSQL Source Adapter
//!
//! Extracts the PostgreSQL source snapshot. Same contract and column list as
//! the MySQL adapter; `client_encoding` is forced to UTF8 on the session and
//! `salary` is cast to `DOUBLE PRECISION` on the wire.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::info;

use employee_sync_domain::repositories::{EmployeeSource, SnapshotWindow};
use employee_sync_domain::value_objects::{RawEmployee, RawValue, SourceKind};
use employee_sync_domain::SyncError;

use crate::infrastructure::config::DbSettings;

use super::mysql_source::classify_fetch_error;

/// PostgreSQL source extractor.
pub struct PostgresEmployeeSource {
    pool: PgPool,
    table: String,
}

impl PostgresEmployeeSource {
    /// Builds a lazy pool with client_encoding forced to UTF8.
    ///
    /// Connection errors surface on first use, inside the extraction stage,
    /// where the coordinator's trigger rules can absorb them.
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

        Self {
            pool,
            table: settings.table.clone(),
        }
    }

    pub fn from_pool(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }
}

#[async_trait]
impl EmployeeSource for PostgresEmployeeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Postgres
    }

    async fn fetch_snapshot(&self, window: Option<SnapshotWindow>) -> Result<Vec<RawEmployee>, SyncError> {
        let base = format!(
            "SELECT id, name, email, department, CAST(salary AS DOUBLE PRECISION) AS salary, \
             hire_date, last_updated FROM {}",
            self.table
        );

        let rows = match window {
            Some(window) => {
                let query = format!("{} WHERE last_updated >= $1 ORDER BY id", base);
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
        .map_err(|e| classify_fetch_error("postgres", e))?;

        let mut snapshot = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: i64 = row
                .try_get::<i64, _>("id")
                .or_else(|_| row.try_get::<i32, _>("id").map(i64::from))
                .map_err(|e| classify_fetch_error("postgres", e))?;

            let mut employee = RawEmployee::new(SourceKind::Postgres, id.to_string());
            employee.name = text_field(row, "name")?;
            employee.email = text_field(row, "email")?;
            employee.department = text_field(row, "department")?;
            employee.salary = RawValue::from_option(
                row.try_get::<Option<f64>, _>("salary")
                    .map_err(|e| classify_fetch_error("postgres", e))?,
                RawValue::Float,
            );
            employee.hire_date = RawValue::from_option(
                row.try_get::<Option<chrono::NaiveDate>, _>("hire_date")
                    .map_err(|e| classify_fetch_error("postgres", e))?,
                RawValue::Date,
            );
            employee.last_updated = RawValue::from_option(
                row.try_get::<Option<chrono::NaiveDateTime>, _>("last_updated")
                    .map_err(|e| classify_fetch_error("postgres", e))?,
                RawValue::Timestamp,
            );
            snapshot.push(employee);
        }

        info!(rows = snapshot.len(), table = %self.table, "postgres snapshot extracted");
        Ok(snapshot)
    }
}

fn text_field(row: &sqlx::postgres::PgRow, column: &str) -> Result<RawValue, SyncError> {
    let value = row
        .try_get::<Option<String>, _>(column)
        .map_err(|e| classify_fetch_error("postgres", e))?;
    Ok(RawValue::from_option(value, RawValue::Text))
}
