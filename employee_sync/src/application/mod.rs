// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Layer
//!
//! The run coordinator: stage sequencing, trigger rules, and structured
//! stage-boundary logging over the domain services and repository ports.

pub mod coordinator;

pub use coordinator::{CoordinatorOptions, SyncCoordinator};
