// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Record Normalisation
//!
//! The transformer's algorithms: field normalisation applied to every raw
//! row, and last-wins deduplication across sources.
//!
//! ## Normalisation Rules (applied in order)
//!
//! 1. `email` — mojibake repair, trim, lowercase; empty result drops the row
//! 2. `name` — mojibake repair, trim; empty result drops the row
//! 3. `department` — mojibake repair, trim, title-case; empty becomes absent
//! 4. `salary` — parse to float; non-parseable becomes absent
//! 5. `hire_date` — the [`date_parser`](super::date_parser) policy
//!
//! ## Deduplication
//!
//! Snapshots are concatenated in [`SourceKind::PRIORITY`] order and the last
//! occurrence per email is kept, making PostgreSQL authoritative over MySQL
//! over the CSV file. Output is sorted by email so downstream processing is
//! deterministic regardless of map iteration order.
//!
//! ## Encoding Repair
//!
//! Text that went through a latin-1 decode of UTF-8 bytes carries the
//! signature artefacts `Ã` and `Â`. When either is present the repair
//! re-encodes each scalar ≤ U+00FF to its byte and re-decodes the buffer as
//! UTF-8; on any failure the original text is kept unchanged. The heuristic
//! only detects the double-UTF-8 signature; pathological inputs pass through.

use std::collections::HashMap;

use crate::entities::StagedEmployee;
use crate::value_objects::{EmailAddress, RawEmployee, RawValue, SourceKind};

use super::date_parser;

/// Normalises one raw row. `None` means the row is dropped: no usable email
/// or name after normalisation.
pub fn normalize_record(raw: &RawEmployee) -> Option<StagedEmployee> {
    let email_text = clean_text(&raw.email)?;
    let email = EmailAddress::new(&email_text).ok()?;

    let name = clean_text(&raw.name)?;

    let department = clean_text(&raw.department).map(|d| title_case(&d));
    let salary = parse_salary(&raw.salary);
    let hire_date = date_parser::parse_date(&raw.hire_date);

    Some(StagedEmployee {
        source: raw.source,
        source_id: raw.source_id.clone(),
        name,
        email,
        department,
        salary,
        hire_date,
    })
}

/// Normalises a concatenated snapshot, returning the surviving rows and the
/// number of rows dropped.
pub fn normalize_snapshot(rows: &[RawEmployee]) -> (Vec<StagedEmployee>, usize) {
    let mut staged = Vec::with_capacity(rows.len());
    let mut dropped = 0;
    for raw in rows {
        match normalize_record(raw) {
            Some(record) => staged.push(record),
            None => dropped += 1,
        }
    }
    (staged, dropped)
}

/// Concatenates per-source snapshots in the fixed priority order, lowest
/// priority first, so that [`dedupe_last_wins`] keeps the most authoritative
/// occurrence.
pub fn concat_in_priority(mut pulls: Vec<(SourceKind, Vec<RawEmployee>)>) -> Vec<RawEmployee> {
    pulls.sort_by_key(|(kind, _)| kind.priority());
    pulls.into_iter().flat_map(|(_, rows)| rows).collect()
}

/// Keeps the last occurrence per email. Input order is the concatenation
/// order; output is sorted by email.
pub fn dedupe_last_wins(staged: Vec<StagedEmployee>) -> Vec<StagedEmployee> {
    let mut by_email: HashMap<String, StagedEmployee> = HashMap::with_capacity(staged.len());
    for record in staged {
        by_email.insert(record.email.as_str().to_string(), record);
    }
    let mut deduped: Vec<StagedEmployee> = by_email.into_values().collect();
    deduped.sort_by(|a, b| a.email.as_str().cmp(b.email.as_str()));
    deduped
}

/// Extracts a trimmed, mojibake-repaired text value; `None` when missing or
/// empty after trimming.
fn clean_text(value: &RawValue) -> Option<String> {
    let text = value.to_text()?;
    let repaired = repair_mojibake(&text);
    let trimmed = repaired.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Title-cases whitespace-separated tokens: first letter upper, rest lower.
pub fn title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|token| {
            let mut chars = token.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Parses a raw salary field; non-parseable values become absent.
pub fn parse_salary(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Float(f) if f.is_finite() => Some(*f),
        RawValue::Integer(n) => Some(*n as f64),
        RawValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

/// Repairs double-UTF-8 corruption when the signature artefacts are present.
pub fn repair_mojibake(input: &str) -> String {
    if !input.contains('\u{00C3}') && !input.contains('\u{00C2}') {
        return input.to_string();
    }

    // latin-1 re-encode: only possible when every scalar fits one byte.
    let mut bytes = Vec::with_capacity(input.len());
    for c in input.chars() {
        let code = c as u32;
        if code > 0xFF {
            return input.to_string();
        }
        bytes.push(code as u8);
    }

    match String::from_utf8(bytes) {
        Ok(repaired) => repaired,
        Err(_) => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn raw(source: SourceKind, id: &str, name: &str, email: &str) -> RawEmployee {
        let mut record = RawEmployee::new(source, id);
        record.name = RawValue::Text(name.to_string());
        record.email = RawValue::Text(email.to_string());
        record
    }

    #[test]
    fn test_normalize_trims_and_lowercases_email() {
        let mut record = raw(SourceKind::Csv, "1", "  Alice Ada  ", "  Alice@X.COM ");
        record.department = RawValue::Text("  engineering dept ".to_string());
        record.salary = RawValue::Text("50000".to_string());
        record.hire_date = RawValue::Text("2020-01-01".to_string());

        let staged = normalize_record(&record).unwrap();
        assert_eq!(staged.email.as_str(), "alice@x.com");
        assert_eq!(staged.name, "Alice Ada");
        assert_eq!(staged.department.as_deref(), Some("Engineering Dept"));
        assert_eq!(staged.salary, Some(50000.0));
        assert_eq!(staged.hire_date, NaiveDate::from_ymd_opt(2020, 1, 1));
    }

    #[test]
    fn test_rows_without_email_or_name_are_dropped() {
        let no_email = raw(SourceKind::Csv, "1", "Alice", "   ");
        assert!(normalize_record(&no_email).is_none());

        let no_name = raw(SourceKind::Csv, "2", "", "a@x.org");
        assert!(normalize_record(&no_name).is_none());

        let mut null_email = raw(SourceKind::Csv, "3", "Bob", "ignored");
        null_email.email = RawValue::Null;
        assert!(normalize_record(&null_email).is_none());
    }

    #[test]
    fn test_normalize_snapshot_counts_drops() {
        let rows = vec![
            raw(SourceKind::Csv, "1", "Alice", "a@x.org"),
            raw(SourceKind::Csv, "2", "", "b@x.org"),
            raw(SourceKind::Csv, "3", "Carol", ""),
        ];
        let (staged, dropped) = normalize_snapshot(&rows);
        assert_eq!(staged.len(), 1);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("human resources"), "Human Resources");
        assert_eq!(title_case("ENGINEERING"), "Engineering");
        assert_eq!(title_case("  it   ops "), "It Ops");
        assert_eq!(title_case("r&d"), "R&d");
    }

    #[test]
    fn test_parse_salary_variants() {
        assert_eq!(parse_salary(&RawValue::Text(" 45000.50 ".into())), Some(45000.50));
        assert_eq!(parse_salary(&RawValue::Integer(40000)), Some(40000.0));
        assert_eq!(parse_salary(&RawValue::Float(39999.99)), Some(39999.99));
        assert_eq!(parse_salary(&RawValue::Text("n/a".into())), None);
        assert_eq!(parse_salary(&RawValue::Text("".into())), None);
        assert_eq!(parse_salary(&RawValue::Null), None);
    }

    /// `é` mis-decoded as latin-1 shows up as `Ã©`; the round-trip must
    /// restore it. Clean text and pathological text must pass unchanged.
    #[test]
    fn test_mojibake_repair() {
        assert_eq!(repair_mojibake("Andr\u{00C3}\u{00A9}"), "André");
        assert_eq!(repair_mojibake("S\u{00C3}\u{00A9}bastien"), "Sébastien");
        assert_eq!(repair_mojibake("plain ascii"), "plain ascii");
        assert_eq!(repair_mojibake("déjà clean"), "déjà clean");
        // Signature present but a scalar above U+00FF: repair must back off.
        assert_eq!(repair_mojibake("Ã\u{0100}"), "Ã\u{0100}");
    }

    #[test]
    fn test_dedupe_keeps_last_occurrence() {
        let csv = normalize_record(&{
            let mut r = raw(SourceKind::Csv, "1", "E", "e@x.org");
            r.department = RawValue::Text("Sales".into());
            r
        })
        .unwrap();
        let mysql = normalize_record(&{
            let mut r = raw(SourceKind::MySql, "2", "E", "e@x.org");
            r.department = RawValue::Text("Eng".into());
            r
        })
        .unwrap();
        let postgres = normalize_record(&{
            let mut r = raw(SourceKind::Postgres, "3", "E", "e@x.org");
            r.department = RawValue::Text("Ops".into());
            r
        })
        .unwrap();

        let deduped = dedupe_last_wins(vec![csv, mysql, postgres]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].source, SourceKind::Postgres);
        assert_eq!(deduped[0].department.as_deref(), Some("Ops"));
    }

    #[test]
    fn test_concat_orders_by_priority() {
        let pulls = vec![
            (SourceKind::Postgres, vec![raw(SourceKind::Postgres, "1", "P", "p@x")]),
            (SourceKind::Csv, vec![raw(SourceKind::Csv, "1", "C", "c@x")]),
            (SourceKind::MySql, vec![raw(SourceKind::MySql, "1", "M", "m@x")]),
        ];
        let rows = concat_in_priority(pulls);
        let order: Vec<SourceKind> = rows.iter().map(|r| r.source).collect();
        assert_eq!(order, vec![SourceKind::Csv, SourceKind::MySql, SourceKind::Postgres]);
    }

    proptest! {
        /// Transformer output is unique per email regardless of input.
        #[test]
        fn prop_dedupe_output_unique_by_email(emails in proptest::collection::vec("[a-c]@[xy]\\.org", 0..20)) {
            let staged: Vec<StagedEmployee> = emails
                .iter()
                .enumerate()
                .map(|(i, email)| {
                    normalize_record(&raw(SourceKind::Csv, &i.to_string(), "Name", email)).unwrap()
                })
                .collect();
            let input_len = staged.len();

            let deduped = dedupe_last_wins(staged);
            let unique: HashSet<&str> = deduped.iter().map(|r| r.email.as_str()).collect();
            prop_assert_eq!(unique.len(), deduped.len());
            prop_assert!(deduped.len() <= input_len);
        }
    }
}
