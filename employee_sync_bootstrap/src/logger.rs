// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Logger
//!
//! Logging for the window before the tracing subscriber exists. CLI parsing
//! and configuration loading can fail while there is nowhere for a tracing
//! event to go, so the bootstrap phase writes through this small trait
//! instead:
//!
//! - [`StderrLogger`] — plain stderr, for the pre-subscriber window
//! - [`TracingLogger`] — routes to `tracing` under the `bootstrap` target,
//!   for bootstrap messages after the subscriber is installed
//! - [`NoOpLogger`] — discards everything, for tests

/// Minimal logging surface for bootstrap-phase code.
pub trait BootstrapLogger: Send + Sync {
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
}

/// Writes to stderr. The only safe sink before the tracing subscriber is
/// installed.
#[derive(Debug, Default)]
pub struct StderrLogger;

impl StderrLogger {
    pub fn new() -> Self {
        Self
    }
}

impl BootstrapLogger for StderrLogger {
    fn error(&self, message: &str) {
        eprintln!("bootstrap error: {}", message);
    }

    fn warn(&self, message: &str) {
        eprintln!("bootstrap warning: {}", message);
    }

    fn info(&self, message: &str) {
        eprintln!("bootstrap: {}", message);
    }

    fn debug(&self, message: &str) {
        eprintln!("bootstrap debug: {}", message);
    }
}

/// Routes bootstrap messages into the installed tracing subscriber, tagged
/// with the `bootstrap` target so they are filterable separately from the
/// pipeline stages.
#[derive(Debug, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl BootstrapLogger for TracingLogger {
    fn error(&self, message: &str) {
        tracing::error!(target: "bootstrap", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "bootstrap", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "bootstrap", "{}", message);
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: "bootstrap", "{}", message);
    }
}

/// Discards all messages; keeps bootstrap logic testable without output.
#[derive(Debug, Default)]
pub struct NoOpLogger;

impl NoOpLogger {
    pub fn new() -> Self {
        Self
    }
}

impl BootstrapLogger for NoOpLogger {
    fn error(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn debug(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(logger: &dyn BootstrapLogger) {
        logger.error("err");
        logger.warn("warn");
        logger.info("info");
        logger.debug("debug");
    }

    #[test]
    fn test_all_loggers_accept_every_level() {
        exercise(&NoOpLogger::new());
        exercise(&TracingLogger::new());
    }
}
