// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Due dates: parsing, wire format and the due/overdue rule.
//!
//! The remote service reports a due date as an RFC 3339 string, an empty
//! string when unset, and older stored records may hold `null` or an empty
//! object. All of the unset forms collapse to `None`.
//!
//! Due flags compare calendar days, not instants:
//!
//! | due             | is_due | is_overdue |
//! |-----------------|--------|------------|
//! | unset           | true   | false      |
//! | before today    | true   | true       |
//! | today           | true   | false      |
//! | after today     | false  | false      |

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::{Error, Result};

/// Wire format used when pushing a due date.
const DUE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Computed due state of a task relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DueFlags {
    pub is_due: bool,
    pub is_overdue: bool,
}

impl DueFlags {
    /// Applies the due/overdue rule for `due` as seen on `today`.
    pub fn compute(due: Option<DateTime<Utc>>, today: NaiveDate) -> Self {
        let Some(due) = due else {
            return DueFlags { is_due: true, is_overdue: false };
        };
        let day = due.date_naive();
        DueFlags { is_due: day <= today, is_overdue: day < today }
    }
}

/// Parses a user- or server-supplied due value.
///
/// Accepts the empty string (unset), `YYYY-MM-DD` (midnight UTC) and any
/// RFC 3339 timestamp.
pub fn parse_due(value: &str) -> Result<Option<DateTime<Utc>>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(Some(midnight.and_utc()));
        }
    }
    Err(Error::InvalidDue(value.to_string()))
}

/// Formats a due value the way the remote service expects it.
pub fn format_due(due: Option<DateTime<Utc>>) -> String {
    due.map(|dt| dt.format(DUE_FORMAT).to_string()).unwrap_or_default()
}

/// Serde adapter for optional due-like timestamps.
///
/// Serializes `None` as `""`. Deserializes strings, `null` and objects; an
/// object (the legacy "empty structure") always means unset.
pub mod serde_due {
    use super::*;

    pub fn serialize<S: Serializer>(due: &Option<DateTime<Utc>>, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&format_due(*due))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error> {
        match serde_json::Value::deserialize(d)? {
            serde_json::Value::String(s) => parse_due(&s).map_err(serde::de::Error::custom),
            serde_json::Value::Null | serde_json::Value::Object(_) => Ok(None),
            other => Err(serde::de::Error::custom(format!("unexpected due value: {other}"))),
        }
    }
}

#[cfg(test)]
#[path = "due_tests.rs"]
mod tests;
