// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Content creation: activities, associative wings and latest updates.

use super::NgoApi;
use crate::error::Result;
use crate::models::forms::{check, ActivityForm, LatestUpdateForm, WingForm};
use crate::services::gateway::to_json;
use crate::services::{Endpoint, Locale, MultipartForm, RequestDescriptor};
use serde_json::Value;

impl NgoApi {
    /// Create an activity. Timing flags are derived from the date.
    pub async fn create_activity(&self, form: &ActivityForm, locale: Locale) -> Result<Value> {
        check(form)?;
        let url = self.endpoints.localized(Endpoint::ActivityItems, locale)?;

        let timing = form.timing();
        let body = MultipartForm::new()
            .text("activity_name", form.activity_name.trim())
            .text("objective", form.objective.trim())
            .text("activity_date_time", form.activity_date_time.trim())
            .text("venue", form.venue.trim())
            .text("activity_fee", form.activity_fee.trim())
            .text("allocated_district", &form.allocated_district)
            .maybe_file("image", form.image.as_ref())
            .text("is_past", timing.is_past)
            .text("is_present", timing.is_present)
            .text("is_upcoming", timing.is_upcoming);

        let created = self
            .send(RequestDescriptor::post(url).multipart(body))
            .await?;
        tracing::info!(locale = %locale, "Activity created");
        Ok(created)
    }

    pub async fn create_wing(&self, form: &WingForm, locale: Locale) -> Result<Value> {
        check(form)?;
        let url = self
            .endpoints
            .localized(Endpoint::AssociativeWings, locale)?;

        let body = MultipartForm::new()
            .text("organization_name", form.organization_name.trim())
            .text("native_wing", form.native_wing.trim())
            .text("short_description", form.short_description.trim())
            .text("address", form.address.trim())
            .text("contact_person_name", form.contact_person_name.trim())
            .text("phone", form.phone.trim())
            .text("email", form.email.trim())
            .maybe_file("image", form.image.as_ref());

        let created = self
            .send(RequestDescriptor::post(url).multipart(body))
            .await?;
        tracing::info!(locale = %locale, "Associative wing created");
        Ok(created)
    }

    pub async fn create_latest_update(
        &self,
        form: &LatestUpdateForm,
        locale: Locale,
    ) -> Result<Value> {
        check(form)?;
        let url = self.endpoints.localized(Endpoint::LatestUpdates, locale)?;
        self.send(RequestDescriptor::post(url).json(to_json(form)?))
            .await
    }
}
