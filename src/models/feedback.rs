// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Public testimonial feed.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Status a testimonial needs before it is shown publicly.
pub const ACCEPTED: &str = "accepted";

/// A testimonial as shown on the public page.
///
/// Null fields are accepted and read as their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub id: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    /// Star rating, 5 when absent or unreadable
    #[serde(default = "default_rating", deserialize_with = "lenient_rating")]
    pub rating: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_rating() -> u8 {
    5
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let rating = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().and_then(|r| u8::try_from(r).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(rating.unwrap_or_else(default_rating))
}

impl Feedback {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// Parse the timestamp formats the backend emits.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

fn created_at(record: &Value) -> Option<DateTime<Utc>> {
    record
        .get("created_at")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)
}

/// Accepted testimonials, newest first, at most `limit`.
///
/// The sort is stable. Records with a missing or unparsable `created_at`
/// sort after all dated records.
pub fn accepted_feedback(records: Vec<Value>, limit: usize) -> Vec<Value> {
    let mut accepted: Vec<(Option<DateTime<Utc>>, Value)> = records
        .into_iter()
        .filter(|r| r.get("status").and_then(Value::as_str) == Some(ACCEPTED))
        .map(|r| (created_at(&r), r))
        .collect();

    accepted.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    accepted.into_iter().take(limit).map(|(_, r)| r).collect()
}
