// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Shutdown Signalling
//!
//! A cooperative shutdown flag for the run coordinator. A run is abandoned
//! at a stage boundary or left to complete; there is no mid-batch
//! cancellation, so the flag is only *polled* between stages, never raced
//! against in-flight writes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Shared cancellation flag, set once and never cleared.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    requested: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks shutdown as requested.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    /// True once shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Spawns a task that sets the flag on ctrl-c. The task lives for the
    /// rest of the process; a second ctrl-c is left to the default handler.
    pub fn listen_for_ctrl_c(&self) {
        let flag = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!(target: "bootstrap", "ctrl-c received, run will stop at the next stage boundary");
                flag.request();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_starts_clear() {
        let flag = ShutdownFlag::new();
        assert!(!flag.is_requested());
    }

    #[test]
    fn test_request_is_visible_through_clones() {
        let flag = ShutdownFlag::new();
        let observer = flag.clone();
        flag.request();
        assert!(observer.is_requested());
    }
}
