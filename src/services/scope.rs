// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role-scoped visibility of records.

use crate::models::fields::{any_eq, any_in, DISTRICT_ADMIN_ID_FIELDS, DISTRICT_FIELDS};
use crate::models::{Role, Session};
use serde_json::Value;

/// Keep only the records the session's role may see. Order is preserved.
///
/// - district-admin: records in the allocated district, or owned by the
///   admin. Without an allocated district nothing is filtered.
/// - region-admin: records in one of the allocated districts. No
///   allocated districts means no records.
/// - admin and member: everything.
pub fn filter_by_scope(records: Vec<Value>, session: &Session) -> Vec<Value> {
    match session.role {
        Role::DistrictAdmin => {
            let districts = session.districts();
            if districts.is_empty() {
                return records;
            }
            records
                .into_iter()
                .filter(|r| {
                    any_in(r, DISTRICT_FIELDS, &districts)
                        || (!session.unique_id.is_empty()
                            && any_eq(r, DISTRICT_ADMIN_ID_FIELDS, &session.unique_id))
                })
                .collect()
        }
        Role::RegionAdmin => {
            let districts = session.districts();
            if districts.is_empty() {
                return Vec::new();
            }
            records
                .into_iter()
                .filter(|r| any_in(r, DISTRICT_FIELDS, &districts))
                .collect()
        }
        Role::Admin | Role::Member => records,
    }
}

/// True when a single record is visible to the session.
pub fn in_scope(record: &Value, session: &Session) -> bool {
    !filter_by_scope(vec![record.clone()], session).is_empty()
}
