// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Employee Sync Domain Layer
//!
//! Pure business logic for the incremental employee reconciliation engine:
//! record types, normalisation rules, diff classification, post-run
//! validation, and the repository ports the infrastructure layer implements.
//!
//! ## Overview
//!
//! The domain layer knows nothing about CSV files, MySQL, PostgreSQL, or the
//! tokio runtime. It defines:
//!
//! - **Entities**: [`entities::StagedEmployee`], [`entities::UnifiedEmployee`],
//!   [`entities::RunReport`]
//! - **Value Objects**: [`value_objects::EmailAddress`] (the business key),
//!   [`value_objects::SourceKind`], [`value_objects::RawValue`]
//! - **Services**: normalisation ([`services::normalizer`]), date parsing
//!   ([`services::date_parser`]), diff classification ([`services::diff`]),
//!   and validation ([`services::validation`])
//! - **Repository Ports**: [`repositories::EmployeeSource`] and
//!   [`repositories::UnifiedStore`], implemented by the infrastructure layer
//!   and by in-memory fakes in tests
//! - **Errors**: [`SyncError`], the single error type every fallible domain
//!   and port operation returns
//!
//! ## Design Rules
//!
//! - Rows cross the extraction boundary as [`value_objects::RawEmployee`], a
//!   fixed field list. String-keyed column access is confined to extractors.
//! - Everything downstream of the transformer carries a validated, normalised
//!   [`value_objects::EmailAddress`]; empty or missing business keys cannot
//!   reach the comparator.
//! - Domain services are synchronous and side-effect free; only the ports are
//!   async, because they wrap I/O.

pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use error::SyncError;
