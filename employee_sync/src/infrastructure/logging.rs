// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Logging
//!
//! Tracing subscriber setup. Every stage boundary in the coordinator emits a
//! structured event through this subscriber; production deployments run the
//! `json` format so the log sink can index the fields, development runs
//! `pretty`.

use tracing::warn;
use tracing_subscriber::EnvFilter;

use employee_sync_domain::SyncError;

/// Installs the global tracing subscriber.
///
/// `level` is a default directive (`info`, `debug`, ...) that `RUST_LOG`
/// refines; `format` selects `pretty` or `json` output. Installing twice is
/// an error — call once from `main`.
pub fn init_tracing(level: &str, format: &str) -> Result<(), SyncError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| SyncError::invalid_config(format!("invalid log level '{}': {}", level, e)))?;

    let result = match format {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init(),
        "pretty" => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
        other => {
            warn!("unknown log format '{}', falling back to pretty", other);
            tracing_subscriber::fmt().with_env_filter(filter).try_init()
        }
    };

    result.map_err(|e| SyncError::internal_error(format!("failed to install tracing subscriber: {}", e)))
}
