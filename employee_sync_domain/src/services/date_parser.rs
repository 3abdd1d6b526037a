// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Hire Date Parser
//!
//! One explicit parser for every form a hire date arrives in, replacing the
//! polymorphic anything-goes parsing the sources were built around.
//!
//! ## Accepted Forms
//!
//! | Input | Interpretation |
//! |---|---|
//! | Already-typed date | passed through |
//! | Already-typed timestamp | calendar date taken |
//! | Integer < 10^12 (absolute) | epoch seconds |
//! | Integer ≥ 10^12 (absolute) | epoch milliseconds |
//! | Text `YYYY-MM-DD` | ISO-8601 date |
//! | Text RFC 3339 / `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS` | ISO-8601 datetime, date taken |
//! | Text of bare digits | epoch, same magnitude rule |
//! | Anything else | absent |
//!
//! Unparseable values become `None`; the transformer treats an absent hire
//! date as a legitimate value, not an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::value_objects::RawValue;

/// Epoch values at or above this magnitude are milliseconds, below it
/// seconds. 10^12 seconds is year 33658; 10^12 milliseconds is 2001.
const EPOCH_MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Parses a raw field into a calendar date under the documented policy.
pub fn parse_date(value: &RawValue) -> Option<NaiveDate> {
    match value {
        RawValue::Null => None,
        RawValue::Date(date) => Some(*date),
        RawValue::Timestamp(ts) => Some(ts.date()),
        RawValue::Integer(n) => from_epoch(*n),
        RawValue::Float(f) => {
            if f.is_finite() {
                from_epoch(f.trunc() as i64)
            } else {
                None
            }
        }
        RawValue::Text(s) => parse_text(s),
    }
}

fn parse_text(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    // Bare digit strings are epochs, not dates.
    if s.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(n) = s.parse::<i64>() {
            return from_epoch(n);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }

    None
}

fn from_epoch(n: i64) -> Option<NaiveDate> {
    let dt = if n.abs() >= EPOCH_MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(n)?
    } else {
        DateTime::from_timestamp(n, 0)?
    };
    Some(dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_typed_values_pass_through() {
        let date = ymd(2020, 1, 1);
        assert_eq!(parse_date(&RawValue::Date(date)), Some(date));

        let ts = date.and_hms_opt(13, 45, 0).unwrap();
        assert_eq!(parse_date(&RawValue::Timestamp(ts)), Some(date));
    }

    #[test]
    fn test_iso_date_and_datetime_text() {
        assert_eq!(parse_date(&RawValue::Text("2020-01-01".into())), Some(ymd(2020, 1, 1)));
        assert_eq!(
            parse_date(&RawValue::Text("2020-01-01T08:30:00".into())),
            Some(ymd(2020, 1, 1))
        );
        assert_eq!(
            parse_date(&RawValue::Text("2020-01-01T08:30:00+02:00".into())),
            Some(ymd(2020, 1, 1))
        );
        assert_eq!(
            parse_date(&RawValue::Text(" 2020-01-01 08:30:00 ".into())),
            Some(ymd(2020, 1, 1))
        );
    }

    /// The magnitude threshold disambiguates seconds from milliseconds:
    /// the same instant must come out of both encodings.
    #[test]
    fn test_epoch_magnitude_disambiguation() {
        let seconds = 1_577_836_800_i64; // 2020-01-01T00:00:00Z
        let millis = seconds * 1000;
        assert_eq!(parse_date(&RawValue::Integer(seconds)), Some(ymd(2020, 1, 1)));
        assert_eq!(parse_date(&RawValue::Integer(millis)), Some(ymd(2020, 1, 1)));
    }

    #[test]
    fn test_epoch_as_digit_text() {
        assert_eq!(
            parse_date(&RawValue::Text("1577836800".into())),
            Some(ymd(2020, 1, 1))
        );
        assert_eq!(
            parse_date(&RawValue::Text("1577836800000".into())),
            Some(ymd(2020, 1, 1))
        );
    }

    #[test]
    fn test_garbage_becomes_absent() {
        assert_eq!(parse_date(&RawValue::Text("not a date".into())), None);
        assert_eq!(parse_date(&RawValue::Text("31/01/2020".into())), None);
        assert_eq!(parse_date(&RawValue::Text("".into())), None);
        assert_eq!(parse_date(&RawValue::Null), None);
        assert_eq!(parse_date(&RawValue::Float(f64::NAN)), None);
    }
}
