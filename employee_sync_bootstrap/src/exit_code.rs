// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Management
//!
//! Standardized Unix exit codes following BSD `sysexits.h` conventions, with
//! a typed mapping from the domain error. The scheduler reads the exit code
//! to decide whether a failed run is worth an automatic retry.
//!
//! ## Exit Code Conventions
//!
//! - **0**: Success
//! - **1**: General error
//! - **64-78**: Specific error conditions (BSD sysexits.h)
//! - **128+N**: Fatal signal N (e.g., 130 = SIGINT)

use std::fmt;

use employee_sync_domain::SyncError;

/// Exit codes following Unix conventions (BSD sysexits.h)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful termination (0)
    #[default]
    Success = 0,

    /// General error (1)
    Error = 1,

    /// Command line usage error (64)
    UsageError = 64,

    /// Data format error (65)
    /// - Source schema mismatch
    /// - Critical post-run invariant violated
    DataError = 65,

    /// Cannot open input (66)
    NoInput = 66,

    /// Service unavailable (69)
    /// - Source or target database unreachable
    Unavailable = 69,

    /// Internal software error (70)
    Software = 70,

    /// I/O error (74)
    IoError = 74,

    /// Temporary failure, retry (75)
    /// - Another run already in flight
    TempFail = 75,

    /// Configuration error (78)
    Config = 78,

    /// Interrupted by signal (SIGINT - Ctrl+C) (130)
    Interrupted = 130,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get human-readable description of exit code
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::Error => "General error",
            ExitCode::UsageError => "Command line usage error",
            ExitCode::DataError => "Data format error",
            ExitCode::NoInput => "Cannot open input",
            ExitCode::Unavailable => "Service unavailable",
            ExitCode::Software => "Internal software error",
            ExitCode::IoError => "I/O error",
            ExitCode::TempFail => "Temporary failure, retry",
            ExitCode::Config => "Configuration error",
            ExitCode::Interrupted => "Interrupted by signal (SIGINT)",
        }
    }

    /// Check if this is a success exit code
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    /// Check if this is an error exit code
    pub fn is_error(self) -> bool {
        !self.is_success()
    }
}

impl From<&SyncError> for ExitCode {
    fn from(error: &SyncError) -> Self {
        match error {
            SyncError::InvalidConfiguration(_) => ExitCode::Config,
            SyncError::SourceUnavailable(_) | SyncError::DatabaseError(_) => ExitCode::Unavailable,
            SyncError::SchemaMismatch(_) | SyncError::CriticalInvariant(_) | SyncError::SerializationError(_) => {
                ExitCode::DataError
            }
            SyncError::ExtractionFailed(_) => ExitCode::NoInput,
            SyncError::IoError(_) => ExitCode::IoError,
            SyncError::PipelineBusy(_) => ExitCode::TempFail,
            SyncError::Cancelled(_) => ExitCode::Interrupted,
            SyncError::TransformFailed(_) | SyncError::ValidationFailed(_) | SyncError::InternalError(_) => {
                ExitCode::Software
            }
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code.as_i32().clamp(0, 255) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::Error.as_i32(), 1);
        assert_eq!(ExitCode::DataError.as_i32(), 65);
        assert_eq!(ExitCode::Config.as_i32(), 78);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_is_success() {
        assert!(ExitCode::Success.is_success());
        assert!(!ExitCode::TempFail.is_success());
    }

    /// The scheduler retries on unavailability but not on schema mismatches;
    /// the error → code mapping encodes that policy.
    #[test]
    fn test_sync_error_mapping() {
        let unavailable = SyncError::source_unavailable("mysql down");
        assert_eq!(ExitCode::from(&unavailable), ExitCode::Unavailable);

        let mismatch = SyncError::schema_mismatch("missing email column");
        assert_eq!(ExitCode::from(&mismatch), ExitCode::DataError);

        let busy = SyncError::PipelineBusy("run in flight".to_string());
        assert_eq!(ExitCode::from(&busy), ExitCode::TempFail);

        let config = SyncError::invalid_config("empty target host");
        assert_eq!(ExitCode::from(&config), ExitCode::Config);
    }

    #[test]
    fn test_display() {
        let display = format!("{}", ExitCode::Unavailable);
        assert!(display.contains("Service unavailable"));
        assert!(display.contains("69"));
    }
}
