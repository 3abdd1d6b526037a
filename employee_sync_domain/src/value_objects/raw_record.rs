// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Raw Record Shape
//!
//! The uniform row shape every extractor emits. Sources disagree on types —
//! the CSV file yields text for everything, the databases yield typed dates
//! and numbers — so each field crosses the boundary as a [`RawValue`] and the
//! transformer owns all interpretation.
//!
//! String-keyed access to source rows (CSV header lookup, result-set column
//! names) is allowed only inside extractors. From here on the field list is
//! fixed and exhaustive.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::source_kind::SourceKind;

/// A single field as it arrived from a source, before normalisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    /// Missing / NULL
    Null,
    /// Free text (CSV fields, database varchar columns)
    Text(String),
    /// Integer (natural ids, epoch timestamps)
    Integer(i64),
    /// Floating point (salary columns cast on the wire)
    Float(f64),
    /// Already-typed calendar date from a database DATE column
    Date(NaiveDate),
    /// Already-typed timestamp from a database DATETIME/TIMESTAMP column
    Timestamp(NaiveDateTime),
}

impl RawValue {
    /// Wraps an optional value, mapping `None` to `Null`.
    pub fn from_option<T, F>(value: Option<T>, wrap: F) -> Self
    where
        F: FnOnce(T) -> RawValue,
    {
        value.map(wrap).unwrap_or(RawValue::Null)
    }

    /// Text rendering of the value, `None` for `Null`.
    ///
    /// Numbers and dates render in their canonical text form; the
    /// transformer re-parses where a stronger type is needed.
    pub fn to_text(&self) -> Option<String> {
        match self {
            RawValue::Null => None,
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Integer(n) => Some(n.to_string()),
            RawValue::Float(f) => Some(f.to_string()),
            RawValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            RawValue::Timestamp(ts) => Some(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

/// One employee row as pulled from a source, tagged with its origin.
///
/// `source_id` is the origin's natural identifier rendered as text; it is
/// carried through to the target on insert and never rewritten afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEmployee {
    pub source: SourceKind,
    pub source_id: String,
    pub name: RawValue,
    pub email: RawValue,
    pub department: RawValue,
    pub salary: RawValue,
    pub hire_date: RawValue,
    pub last_updated: RawValue,
}

impl RawEmployee {
    /// Creates an empty row for the given source; extractors fill fields in.
    pub fn new(source: SourceKind, source_id: impl Into<String>) -> Self {
        Self {
            source,
            source_id: source_id.into(),
            name: RawValue::Null,
            email: RawValue::Null,
            department: RawValue::Null,
            salary: RawValue::Null,
            hire_date: RawValue::Null,
            last_updated: RawValue::Null,
        }
    }
}
