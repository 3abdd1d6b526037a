// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Value Objects
//!
//! Immutable, validated values used throughout the reconciliation engine:
//!
//! - [`EmailAddress`] — the normalised business key
//! - [`SourceKind`] — origin tag and the fixed source-priority order
//! - [`RawValue`] / [`RawEmployee`] — the typed row shape extractors emit
//!
//! Value objects validate at construction; once built they cannot hold an
//! invalid state.

pub mod email_address;
pub mod raw_record;
pub mod source_kind;

pub use email_address::EmailAddress;
pub use raw_record::{RawEmployee, RawValue};
pub use source_kind::SourceKind;
