// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! Error types for the employee sync domain. The whole engine speaks one
//! error enum, [`SyncError`]; stage trigger rules in the coordinator decide
//! which variants abort a run and which are absorbed.

pub mod sync_error;

pub use sync_error::SyncError;
