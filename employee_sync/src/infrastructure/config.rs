// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Configuration
//!
//! Run configuration for the sync engine: source locations, target
//! connection parameters, and run-shaping knobs.
//!
//! ## Loading
//!
//! Configuration is resolved in three layers, later layers winning:
//!
//! 1. Built-in defaults (the container-deployment values)
//! 2. An optional TOML file (missing file logs a warning and uses defaults)
//! 3. Environment variables, using the names the deployment has always used
//!    (`CSV_FILE_PATH`, `MYSQL_SOURCE_*`, `POSTGRES_SOURCE_*`,
//!    `POSTGRES_*` for the target)
//!
//! ## Sensitive Data
//!
//! Passwords come from the environment in deployment; the TOML file is for
//! local development. Nothing here logs credential values.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

use employee_sync_domain::SyncError;

/// Connection parameters for one database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Table read from (sources) — ignored for the target.
    #[serde(default)]
    pub table: String,
}

/// CSV source settings. The effective path is the explicit one when set,
/// otherwise the first existing candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvSettings {
    /// Explicit path; overrides the candidate list when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Ordered fallback candidates; first existing wins.
    #[serde(default = "default_csv_candidates")]
    pub candidates: Vec<PathBuf>,
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            path: None,
            candidates: default_csv_candidates(),
        }
    }
}

/// Run-shaping knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSettings {
    /// Restrict database extraction to rows updated within this many days.
    /// `None` pulls full snapshots, which is the safe fallback.
    #[serde(default = "default_window", skip_serializing_if = "Option::is_none")]
    pub incremental_window_days: Option<i64>,
    /// Skip the deletion detector when any extractor failed, trading
    /// staleness for protection against over-deletion on a source outage.
    #[serde(default)]
    pub skip_retirement_on_source_failure: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            incremental_window_days: default_window(),
            skip_retirement_on_source_failure: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Complete configuration for one run. Every section is optional in the
/// file; missing sections fall back to the container-deployment defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub csv: CsvSettings,
    #[serde(default = "default_mysql_source")]
    pub mysql_source: DbSettings,
    #[serde(default = "default_postgres_source")]
    pub postgres_source: DbSettings,
    #[serde(default = "default_target")]
    pub target: DbSettings,
    #[serde(default)]
    pub sync: RunSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            csv: CsvSettings::default(),
            mysql_source: default_mysql_source(),
            postgres_source: default_postgres_source(),
            target: default_target(),
            sync: RunSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

fn default_csv_candidates() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/data/data.csv"),
        PathBuf::from("data/data.csv"),
        PathBuf::from("/app/data/data.csv"),
    ]
}

fn default_window() -> Option<i64> {
    Some(30)
}

fn default_mysql_source() -> DbSettings {
    DbSettings {
        host: "mysql-source".to_string(),
        port: 3306,
        database: "source_db".to_string(),
        user: "mysqluser".to_string(),
        password: "mysqlpass".to_string(),
        table: "employees_mysql".to_string(),
    }
}

fn default_postgres_source() -> DbSettings {
    DbSettings {
        host: "postgres-source".to_string(),
        port: 5432,
        database: "source_db".to_string(),
        user: "sourceuser".to_string(),
        password: "sourcepass".to_string(),
        table: "employees_source".to_string(),
    }
}

fn default_target() -> DbSettings {
    DbSettings {
        host: "postgres-target".to_string(),
        port: 5432,
        database: "target_db".to_string(),
        user: "targetuser".to_string(),
        password: "targetpass".to_string(),
        table: String::new(),
    }
}

impl SyncConfig {
    /// Loads configuration: file (optional) then environment overrides.
    pub fn load(config_path: Option<&Path>) -> Result<Self, SyncError> {
        let mut config = match config_path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| SyncError::invalid_config(format!("failed to read config file {:?}: {}", path, e)))?;
                toml::from_str(&content)
                    .map_err(|e| SyncError::invalid_config(format!("failed to parse config file {:?}: {}", path, e)))?
            }
            Some(path) => {
                warn!("config file not found at {:?}, using defaults", path);
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Applies the deployment's environment variable names on top of the
    /// file/default values.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = env::var("CSV_FILE_PATH") {
            if !path.is_empty() {
                self.csv.path = Some(PathBuf::from(path));
            }
        }

        override_db(&mut self.mysql_source, "MYSQL_SOURCE");
        override_db(&mut self.postgres_source, "POSTGRES_SOURCE");
        override_db(&mut self.target, "POSTGRES");

        if let Ok(level) = env::var("EMPLOYEE_SYNC_LOG_LEVEL") {
            if !level.is_empty() {
                self.logging.level = level;
            }
        }
    }

    /// Rejects configurations no run could succeed under.
    pub fn validate(&self) -> Result<(), SyncError> {
        for (name, db) in [
            ("mysql_source", &self.mysql_source),
            ("postgres_source", &self.postgres_source),
            ("target", &self.target),
        ] {
            if db.host.trim().is_empty() {
                return Err(SyncError::invalid_config(format!("{}: host is empty", name)));
            }
            if db.database.trim().is_empty() {
                return Err(SyncError::invalid_config(format!("{}: database is empty", name)));
            }
        }
        if self.mysql_source.table.trim().is_empty() || self.postgres_source.table.trim().is_empty() {
            return Err(SyncError::invalid_config("source table name is empty"));
        }
        if let Some(days) = self.sync.incremental_window_days {
            if days <= 0 {
                return Err(SyncError::invalid_config(format!(
                    "incremental_window_days must be positive, got {}",
                    days
                )));
            }
        }
        Ok(())
    }

    /// Ordered CSV path candidates for this run; explicit path first.
    pub fn csv_candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(path) = &self.csv.path {
            candidates.push(path.clone());
        }
        candidates.extend(self.csv.candidates.iter().cloned());
        candidates
    }
}

fn override_db(db: &mut DbSettings, prefix: &str) {
    if let Ok(host) = env::var(format!("{}_HOST", prefix)) {
        if !host.is_empty() {
            db.host = host;
        }
    }
    if let Ok(port) = env::var(format!("{}_PORT", prefix)) {
        if let Ok(port) = port.parse() {
            db.port = port;
        }
    }
    if let Ok(database) = env::var(format!("{}_DB", prefix)) {
        if !database.is_empty() {
            db.database = database;
        }
    }
    if let Ok(user) = env::var(format!("{}_USER", prefix)) {
        if !user.is_empty() {
            db.user = user;
        }
    }
    if let Ok(password) = env::var(format!("{}_PASSWORD", prefix)) {
        if !password.is_empty() {
            db.password = password;
        }
    }
}
