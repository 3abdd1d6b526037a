// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Repository Adapters
//!
//! Concrete implementations of the domain ports:
//!
//! - [`csv_source`] — delimited UTF-8 file over the `csv` crate
//! - [`mysql_source`] — MySQL source database over `sqlx`
//! - [`postgres_source`] — PostgreSQL source database over `sqlx`
//! - [`postgres_unified`] — the unified target table over `sqlx`, including
//!   the loader's batched-transaction protocol
//!
//! String-keyed access to source rows lives here and nowhere else; adapters
//! emit the fixed `RawEmployee` shape.

pub mod csv_source;
pub mod mysql_source;
pub mod postgres_source;
pub mod postgres_unified;

pub use csv_source::CsvEmployeeSource;
pub use mysql_source::MySqlEmployeeSource;
pub use postgres_source::PostgresEmployeeSource;
pub use postgres_unified::PostgresUnifiedStore;
