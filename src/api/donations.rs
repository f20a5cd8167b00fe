// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Donation records.

use super::NgoApi;
use crate::error::Result;
use crate::services::{Endpoint, RequestDescriptor};
use serde_json::Value;

/// The two donation collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationKind {
    /// Linked to an activity (`/api/donate-society/`)
    Society,
    /// General donations (`/api/donate/`)
    General,
}

impl DonationKind {
    fn endpoint(&self) -> Endpoint {
        match self {
            DonationKind::Society => Endpoint::SocietyDonations,
            DonationKind::General => Endpoint::Donations,
        }
    }
}

impl NgoApi {
    pub async fn donations(&self, kind: DonationKind) -> Result<Vec<Value>> {
        self.get_records(self.endpoints.url(kind.endpoint())).await
    }

    pub async fn create_donation(&self, kind: DonationKind, donation: Value) -> Result<Value> {
        let url = self.endpoints.url(kind.endpoint());
        self.send(RequestDescriptor::post(url).json(donation)).await
    }

    /// Update a donation. The body must carry its `id`.
    pub async fn update_donation(&self, kind: DonationKind, donation: Value) -> Result<Value> {
        let url = self.endpoints.url(kind.endpoint());
        self.send(RequestDescriptor::put(url).json(donation)).await
    }
}
