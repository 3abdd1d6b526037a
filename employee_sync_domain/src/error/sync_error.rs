// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Sync Error Type
//!
//! This module provides the error system for the employee reconciliation
//! domain. Failures are categorised so the run coordinator and the scheduler
//! above it can apply the right policy without string matching.
//!
//! ## Error Categories
//!
//! ### Configuration Errors
//! - **InvalidConfiguration**: Malformed or missing configuration settings
//!
//! ### Extraction Errors
//! - **SourceUnavailable**: A source could not be reached (connection, auth);
//!   the run continues with an empty snapshot for that source
//! - **SchemaMismatch**: A source is missing an expected column; the run
//!   aborts with a structured diagnostic
//! - **ExtractionFailed**: Any other unrecoverable extraction failure
//!   (encoding, truncated file)
//!
//! ### Pipeline Errors
//! - **TransformFailed**: Normalisation or deduplication failure
//! - **ValidationFailed**: A post-run check could not be evaluated
//! - **CriticalInvariant**: A critical post-run invariant was violated; the
//!   run is reported failed
//!
//! ### Infrastructure Errors
//! - **DatabaseError**: Target or source database operation failures
//! - **IoError**: File system I/O failures
//! - **SerializationError**: Payload encoding/decoding failures
//!
//! ### Coordination Errors
//! - **PipelineBusy**: A second concurrent run was refused
//! - **Cancelled**: The run was abandoned at a stage boundary
//! - **InternalError**: Unexpected failures
//!
//! ## Propagation Policy
//!
//! Row-level failures are absorbed where they occur (logged and counted in
//! the run report). Stage-level failures surface as `SyncError` to the
//! coordinator, which applies the stage's trigger rule. The scheduler decides
//! retries based on [`SyncError::is_recoverable`].

use thiserror::Error;

/// Domain-specific errors for the employee reconciliation engine.
///
/// Each variant carries a descriptive message. Variants are grouped by the
/// policy applied to them: some abort the run outright
/// ([`SyncError::is_fatal_for_run`]), some mark a single source as failed for
/// the run, and some are worth a retry from the scheduler
/// ([`SyncError::is_recoverable`]).
#[derive(Error, Debug, Clone)]
pub enum SyncError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Source schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Transform failed: {0}")]
    TransformFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Critical invariant violated: {0}")]
    CriticalInvariant(String),

    #[error("Pipeline busy: {0}")]
    PipelineBusy(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl SyncError {
    /// Creates a new configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Creates a new source-unavailable error
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }

    /// Creates a new schema mismatch error
    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch(msg.into())
    }

    /// Creates a new extraction error
    pub fn extraction_failed(msg: impl Into<String>) -> Self {
        Self::ExtractionFailed(msg.into())
    }

    /// Creates a new transform error
    pub fn transform_failed(msg: impl Into<String>) -> Self {
        Self::TransformFailed(msg.into())
    }

    /// Creates a new database error
    pub fn database_error(msg: impl Into<String>) -> Self {
        Self::DatabaseError(msg.into())
    }

    /// Creates a new IO error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::IoError(msg.into())
    }

    /// Creates a new validation error
    pub fn validation_failed(msg: impl Into<String>) -> Self {
        Self::ValidationFailed(msg.into())
    }

    /// Creates a new critical invariant error
    pub fn critical_invariant(msg: impl Into<String>) -> Self {
        Self::CriticalInvariant(msg.into())
    }

    /// Creates a new internal error
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Checks if the error indicates a condition worth retrying the whole run
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SyncError::SourceUnavailable(_) | SyncError::DatabaseError(_) | SyncError::IoError(_)
        )
    }

    /// Checks if the error must abort the run regardless of stage trigger rules
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(
            self,
            SyncError::SchemaMismatch(_) | SyncError::CriticalInvariant(_) | SyncError::InvalidConfiguration(_)
        )
    }
}

impl From<std::io::Error> for SyncError {
    fn from(error: std::io::Error) -> Self {
        SyncError::IoError(error.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(error: serde_json::Error) -> Self {
        SyncError::SerializationError(error.to_string())
    }
}
