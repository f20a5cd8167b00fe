// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Member registrations.

use super::NgoApi;
use crate::error::{AppError, Result};
use crate::models::fields::member_identity;
use crate::models::Role;
use crate::services::{filter_by_scope, Endpoint};
use futures_util::{stream, StreamExt};
use serde_json::Value;
use std::collections::HashSet;

const MAX_CONCURRENT_DISTRICT_FETCHES: usize = 4;

pub const NO_DISTRICTS: &str =
    "No districts assigned to your account. Please contact administrator.";

impl NgoApi {
    /// List members, optionally scoped server-side to one district.
    pub async fn members(&self, district: Option<&str>) -> Result<Vec<Value>> {
        let url = match district {
            Some(d) => self.endpoints.url_with(Endpoint::Members, &[("district", d)]),
            None => self.endpoints.url(Endpoint::Members),
        };
        self.get_records(url).await
    }

    /// Members visible to the current session.
    ///
    /// Region admins fetch each allocated district separately. A district
    /// that fails is skipped; an expired session is not.
    pub async fn members_in_scope(&self) -> Result<Vec<Value>> {
        let session = self.require_session()?;

        if session.role != Role::RegionAdmin {
            let records = self.members(None).await?;
            return Ok(filter_by_scope(records, &session));
        }

        let districts = session.districts();
        if districts.is_empty() {
            return Err(AppError::NotFound(NO_DISTRICTS.to_string()));
        }

        let results: Vec<(String, Result<Vec<Value>>)> = stream::iter(districts)
            .map(|district| async move {
                let result = self.members(Some(&district)).await;
                (district, result)
            })
            .buffered(MAX_CONCURRENT_DISTRICT_FETCHES)
            .collect()
            .await;

        let mut all = Vec::new();
        for (district, result) in results {
            match result {
                Ok(records) => {
                    tracing::debug!(district = %district, count = records.len(), "Fetched members");
                    all.extend(records);
                }
                Err(AppError::SessionExpired) => return Err(AppError::SessionExpired),
                Err(e) => {
                    tracing::warn!(district = %district, error = %e, "Skipping district");
                }
            }
        }

        Ok(filter_by_scope(dedupe_members(all), &session))
    }
}

/// Drop repeated members, keeping the first occurrence. Records without
/// an identity are kept as is.
pub fn dedupe_members(records: Vec<Value>) -> Vec<Value> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| match member_identity(r) {
            Some(id) => seen.insert(id),
            None => true,
        })
        .collect()
}
