// /////////////////////////////////////////////////////////////////////////////
// Employee Sync RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Email Address
//!
//! The business key of the unified table. An [`EmailAddress`] can only be
//! constructed in normalised form (trimmed, lowercased, non-empty), so every
//! record downstream of the transformer carries a key that is safe to index,
//! join, and compare with plain string equality.
//!
//! Uniqueness across the target table is enforced by the store; this type
//! guarantees the *shape* of the key, not its uniqueness.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SyncError;

/// Normalised email business key.
///
/// Construction applies the normalisation rule the comparator relies on:
/// surrounding whitespace is stripped and the value is lowercased. An input
/// that is empty after trimming is rejected — the transformer drops such
/// rows before they reach any later stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a normalised email address, rejecting empty input.
    pub fn new(raw: &str) -> Result<Self, SyncError> {
        let normalized = Self::normalize(raw);
        if normalized.is_empty() {
            return Err(SyncError::transform_failed("email is empty after normalisation"));
        }
        Ok(EmailAddress(normalized))
    }

    /// Applies the key normalisation without constructing: trim + lowercase.
    ///
    /// Also used on values read back from the target so pre-normalisation
    /// rows still index correctly.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_construction_normalizes() {
        let email = EmailAddress::new("  Alice@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
    }

    #[test]
    fn test_empty_after_trim_is_rejected() {
        assert!(EmailAddress::new("   ").is_err());
        assert!(EmailAddress::new("").is_err());
    }

    #[test]
    fn test_already_normalized_is_untouched() {
        let email = EmailAddress::new("bob@x.org").unwrap();
        assert_eq!(email.as_str(), "bob@x.org");
    }

    proptest! {
        /// Normalisation is idempotent: normalising a normalised key is a
        /// no-op. The comparator's index relies on this.
        #[test]
        fn prop_normalize_is_idempotent(raw in "\\PC{0,64}") {
            let once = EmailAddress::normalize(&raw);
            let twice = EmailAddress::normalize(&once);
            prop_assert_eq!(once, twice);
        }

        /// Every constructible email is non-empty, trimmed, and lowercase.
        #[test]
        fn prop_constructed_emails_are_normalized(raw in "\\PC{1,64}") {
            if let Ok(email) = EmailAddress::new(&raw) {
                let s = email.as_str();
                prop_assert!(!s.is_empty());
                prop_assert_eq!(s.trim(), s);
                prop_assert_eq!(s.to_lowercase(), s);
            }
        }
    }
}
