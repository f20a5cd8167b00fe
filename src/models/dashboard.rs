// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Admin dashboard aggregates.

use serde::Serialize;
use serde_json::Value;

/// Member approval counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemberCounts {
    pub total: usize,
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
}

impl MemberCounts {
    pub fn from_records(records: &[Value]) -> Self {
        let mut counts = Self {
            total: records.len(),
            ..Self::default()
        };
        for status in records.iter().filter_map(status_of) {
            match status {
                "pending" => counts.pending += 1,
                "accepted" => counts.accepted += 1,
                "rejected" => counts.rejected += 1,
                _ => {}
            }
        }
        counts
    }
}

/// Donation payment counts. Backend statuses are upper-case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DonationCounts {
    pub total: usize,
    pub pending: usize,
    pub success: usize,
    pub failed: usize,
}

impl DonationCounts {
    pub fn from_records(records: &[Value]) -> Self {
        let mut counts = Self {
            total: records.len(),
            ..Self::default()
        };
        for status in records.iter().filter_map(status_of) {
            match status {
                "PENDING" => counts.pending += 1,
                "SUCCESS" => counts.success += 1,
                "FAILED" => counts.failed += 1,
                _ => {}
            }
        }
        counts
    }
}

fn status_of(record: &Value) -> Option<&str> {
    record.get("status").and_then(Value::as_str)
}

/// One dashboard panel: its data, or the error that replaced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section<T> {
    Loaded(T),
    Failed(String),
}

impl<T> Section<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Section::Loaded(v) => Some(v),
            Section::Failed(_) => None,
        }
    }
}

/// Admin dashboard. Each section loads independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub members: Section<MemberCounts>,
    pub society_donations: Section<DonationCounts>,
    pub general_donations: Section<DonationCounts>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counts_ignore_unknown_statuses() {
        let members = vec![
            json!({"status": "pending"}),
            json!({"status": "accepted"}),
            json!({"status": "Accepted"}),
            json!({}),
        ];
        let counts = MemberCounts::from_records(&members);
        assert_eq!(counts.total, 4);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.accepted, 1);

        let donations = vec![json!({"status": "SUCCESS"}), json!({"status": "FAILED"})];
        let counts = DonationCounts::from_records(&donations);
        assert_eq!((counts.success, counts.failed, counts.pending), (1, 1, 0));
    }
}
