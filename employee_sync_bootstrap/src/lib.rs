// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Employee Sync Bootstrap
//!
//! Process-level concerns that run before and around the application layer:
//!
//! - **CLI parsing** ([`cli`]) — clap argument definitions
//! - **Exit codes** ([`exit_code`]) — BSD `sysexits.h` conventions, with a
//!   typed mapping from [`employee_sync_domain::SyncError`]
//! - **Shutdown signalling** ([`shutdown`]) — a ctrl-c flag the coordinator
//!   polls at stage boundaries
//! - **Bootstrap logger** ([`logger`]) — minimal logging before the tracing
//!   subscriber is installed
//!
//! The bootstrap crate depends on the domain crate only for the error type;
//! it knows nothing about sources, stores, or stages.

pub mod cli;
pub mod exit_code;
pub mod logger;
pub mod shutdown;

pub use cli::Cli;
pub use exit_code::ExitCode;
pub use logger::{BootstrapLogger, NoOpLogger, StderrLogger, TracingLogger};
pub use shutdown::ShutdownFlag;
