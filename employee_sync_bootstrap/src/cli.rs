// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command Line Interface
//!
//! Argument definitions for the sync binary. The scheduler invokes the
//! binary once per run; there are no subcommands, only run-shaping flags.

use clap::Parser;
use std::path::PathBuf;

/// Consolidates employee records from the CSV, MySQL, and PostgreSQL sources
/// into the unified target table. One invocation performs one incremental
/// reconciliation run.
#[derive(Debug, Parser)]
#[command(name = "employee_sync", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level override (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Disable the incremental extraction window: pull full snapshots from
    /// every source for this run
    #[arg(long)]
    pub full_snapshot: bool,

    /// Print the effective configuration and exit without running
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["employee_sync"]);
        assert!(cli.config.is_none());
        assert!(cli.log_level.is_none());
        assert!(!cli.full_snapshot);
        assert!(!cli.show_config);
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::parse_from([
            "employee_sync",
            "--config",
            "/etc/employee_sync.toml",
            "--log-level",
            "debug",
            "--full-snapshot",
        ]);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/etc/employee_sync.toml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(cli.full_snapshot);
    }
}
