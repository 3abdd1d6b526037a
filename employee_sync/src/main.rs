// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Employee Sync Binary
//!
//! Entry point for one reconciliation run. The workflow scheduler invokes
//! this binary on its daily schedule and reads the process exit code to
//! decide on retries:
//!
//! - `0` — all stages completed and the critical validator check passed
//! - `69` — a database was unreachable (retry-able)
//! - `65` — schema mismatch or critical invariant violation (not retry-able)
//! - `75` — another run was already in flight
//! - `78` — configuration error
//!
//! Startup order matters: configuration resolves before the tracing
//! subscriber so the subscriber honours the configured level; pools are
//! built lazily so a down source is handled by the run's trigger rules
//! instead of failing process startup.

use std::process::ExitCode as ProcessExitCode;
use std::sync::Arc;
use tracing::{error, info};

use employee_sync::application::{CoordinatorOptions, SyncCoordinator};
use employee_sync::infrastructure::config::SyncConfig;
use employee_sync::infrastructure::logging;
use employee_sync::infrastructure::repositories::{
    CsvEmployeeSource, MySqlEmployeeSource, PostgresEmployeeSource, PostgresUnifiedStore,
};
use employee_sync_bootstrap::{BootstrapLogger, Cli, ExitCode, ShutdownFlag, StderrLogger, TracingLogger};
use employee_sync_domain::repositories::EmployeeSource;
use employee_sync_domain::SyncError;

#[tokio::main]
async fn main() -> ProcessExitCode {
    // The subscriber is not installed yet; the stderr logger covers the
    // CLI/config window.
    let boot = StderrLogger::new();
    let cli = Cli::parse_args();

    let mut config = match SyncConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            boot.error(&format!("configuration error: {}", e));
            return ExitCode::from(&e).into();
        }
    };

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if cli.full_snapshot {
        config.sync.incremental_window_days = None;
    }

    if cli.show_config {
        match toml::to_string_pretty(&config) {
            Ok(rendered) => {
                println!("{}", rendered);
                return ExitCode::Success.into();
            }
            Err(e) => {
                boot.error(&format!("failed to render configuration: {}", e));
                return ExitCode::Error.into();
            }
        }
    }

    if let Err(e) = logging::init_tracing(&config.logging.level, &config.logging.format) {
        boot.error(&format!("logging setup failed: {}", e));
        return ExitCode::from(&e).into();
    }
    TracingLogger::new().info("bootstrap complete, starting reconciliation");

    match run(config).await {
        Ok(()) => ExitCode::Success.into(),
        Err(e) => {
            error!(error = %e, recoverable = e.is_recoverable(), "run failed");
            ExitCode::from(&e).into()
        }
    }
}

async fn run(config: SyncConfig) -> Result<(), SyncError> {
    let store = Arc::new(PostgresUnifiedStore::connect_lazy(&config.target));
    store.ensure_schema().await?;

    let sources: Vec<Arc<dyn EmployeeSource>> = vec![
        Arc::new(CsvEmployeeSource::new(config.csv_candidates())),
        Arc::new(MySqlEmployeeSource::connect_lazy(&config.mysql_source)),
        Arc::new(PostgresEmployeeSource::connect_lazy(&config.postgres_source)),
    ];

    let shutdown = ShutdownFlag::new();
    shutdown.listen_for_ctrl_c();

    let coordinator = SyncCoordinator::new(
        sources,
        store,
        CoordinatorOptions {
            incremental_window_days: config.sync.incremental_window_days,
            skip_retirement_on_source_failure: config.sync.skip_retirement_on_source_failure,
        },
        shutdown,
    );

    let report = coordinator.run().await?;
    info!(
        staged = report.staged,
        inserted = report.load.inserted,
        updated = report.load.updated,
        retired = report.retired,
        errors = report.load.errors,
        "sync complete"
    );
    Ok(())
}
