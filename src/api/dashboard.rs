// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin dashboard summary.

use super::{DonationKind, NgoApi};
use crate::error::{AppError, Result};
use crate::models::{DashboardSummary, DonationCounts, MemberCounts, Section};
use serde_json::Value;

fn section<T>(name: &str, result: Result<Vec<Value>>, count: fn(&[Value]) -> T) -> Section<T> {
    match result {
        Ok(records) => Section::Loaded(count(&records)),
        Err(e) => {
            tracing::warn!(section = name, error = %e, "Dashboard section failed");
            Section::Failed(e.notice_message())
        }
    }
}

impl NgoApi {
    /// Fetch members and both donation collections concurrently.
    ///
    /// A failing section does not stop the others. An expired session
    /// fails the whole summary.
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let (members, society, general) = tokio::join!(
            self.members(None),
            self.donations(DonationKind::Society),
            self.donations(DonationKind::General),
        );

        if [&members, &society, &general]
            .iter()
            .any(|r| matches!(r, Err(AppError::SessionExpired)))
        {
            return Err(AppError::SessionExpired);
        }

        Ok(DashboardSummary {
            members: section("members", members, MemberCounts::from_records),
            society_donations: section("society_donations", society, DonationCounts::from_records),
            general_donations: section("general_donations", general, DonationCounts::from_records),
        })
    }
}
