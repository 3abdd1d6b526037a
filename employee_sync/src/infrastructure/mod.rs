// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Layer
//!
//! Everything that touches the outside world: configuration loading, the
//! tracing subscriber, and the concrete repository adapters.

pub mod config;
pub mod logging;
pub mod repositories;
