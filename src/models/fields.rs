// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Backend field names, in the order they are consulted.
//!
//! Different endpoints name the same concept differently. Every lookup of
//! these concepts goes through the lists below.

use super::session::scalar_string;
use serde_json::Value;

/// Fields that hold a record's district.
pub const DISTRICT_FIELDS: &[&str] = &["district", "allocated_district"];

/// Fields that hold the owning district admin.
pub const DISTRICT_ADMIN_ID_FIELDS: &[&str] = &["district_admin_id"];

/// Fields that identify a member.
pub const MEMBER_ID_FIELDS: &[&str] = &["member_id", "unique_id", "id"];

/// Fields that identify who sent a mail.
pub const MAIL_SENDER_FIELDS: &[&str] = &[
    "district_admin_id",
    "region_admin_id",
    "region_admin",
    "admin",
];

/// First non-empty scalar among `fields`, as a string.
pub fn first_str(record: &Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|f| record.get(*f))
        .filter_map(scalar_string)
        .find(|s| !s.is_empty())
}

/// True when any of `fields` holds a scalar equal to `expected`.
///
/// Numbers compare by their decimal string.
pub fn any_eq(record: &Value, fields: &[&str], expected: &str) -> bool {
    fields
        .iter()
        .filter_map(|f| record.get(*f))
        .filter_map(scalar_string)
        .any(|s| s == expected)
}

/// True when any of `fields` holds a scalar contained in `allowed`.
pub fn any_in(record: &Value, fields: &[&str], allowed: &[String]) -> bool {
    fields
        .iter()
        .filter_map(|f| record.get(*f))
        .filter_map(scalar_string)
        .any(|s| allowed.iter().any(|a| *a == s))
}

/// Member identity used for de-duplication and recipient matching.
pub fn member_identity(record: &Value) -> Option<String> {
    first_str(record, MEMBER_ID_FIELDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_str_respects_priority() {
        let rec = json!({"id": 7, "unique_id": "M-7"});
        assert_eq!(member_identity(&rec).as_deref(), Some("M-7"));

        let rec = json!({"member_id": "", "id": 7});
        assert_eq!(member_identity(&rec).as_deref(), Some("7"));
    }

    #[test]
    fn test_any_eq_compares_numbers_as_strings() {
        let rec = json!({"district_admin_id": 12});
        assert!(any_eq(&rec, DISTRICT_ADMIN_ID_FIELDS, "12"));
        assert!(!any_eq(&rec, DISTRICT_ADMIN_ID_FIELDS, "120"));
    }
}
