// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Employee Sync Application
//!
//! Application and infrastructure layers of the incremental employee
//! reconciliation engine.
//!
//! ## Overview
//!
//! Each scheduled run pulls a snapshot from three heterogeneous sources —
//! a delimited UTF-8 file, a MySQL database, and a PostgreSQL database —
//! normalises and deduplicates the rows, diffs them against the unified
//! target table, and applies the resulting inserts, updates, reactivations,
//! and soft-deletes transactionally.
//!
//! ```text
//!   extract csv  ─┐
//!   extract mysql ┼──► transform ──► compare ──► retire ──► load ──► validate
//!   extract pg   ─┘
//! ```
//!
//! ## Architecture
//!
//! - **Application layer** ([`application`]): the run coordinator — stage
//!   sequencing, trigger rules, stage-boundary logging and cancellation.
//! - **Infrastructure layer** ([`infrastructure`]): configuration, tracing
//!   setup, and the concrete source/store adapters over `csv` and `sqlx`.
//!
//! Business rules (normalisation, diff classification, validation) live in
//! `employee-sync-domain`; this crate wires them to the outside world.

pub mod application;
pub mod infrastructure;
