// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! District and region admin registrations.

use super::{id_value, NgoApi};
use crate::error::{AppError, Result};
use crate::models::forms::{check, DistrictAdminForm, RegionAdminForm};
use crate::services::gateway::to_json;
use crate::services::{Endpoint, Locale, RequestDescriptor};
use serde_json::Value;

impl NgoApi {
    pub async fn register_district_admin(
        &self,
        form: &DistrictAdminForm,
        locale: Locale,
    ) -> Result<Value> {
        check(form)?;
        let url = self.endpoints.localized(Endpoint::DistrictAdmins, locale)?;
        let created = self
            .send(RequestDescriptor::post(url).json(to_json(form)?))
            .await?;
        tracing::info!(district = %form.allocated_district, "District admin registered");
        Ok(created)
    }

    pub async fn register_region_admin(
        &self,
        form: &RegionAdminForm,
        locale: Locale,
    ) -> Result<Value> {
        check(form)?;
        let url = self.endpoints.localized(Endpoint::RegionAdmins, locale)?;
        let created = self
            .send(RequestDescriptor::post(url).json(to_json(form)?))
            .await?;
        tracing::info!(
            districts = form.allocated_district.len(),
            "Region admin registered"
        );
        Ok(created)
    }

    pub async fn district_admins(&self) -> Result<Vec<Value>> {
        self.get_records(self.endpoints.url(Endpoint::DistrictAdmins))
            .await
    }

    pub async fn region_admins(&self) -> Result<Vec<Value>> {
        self.get_records(self.endpoints.url(Endpoint::RegionAdmins))
            .await
    }

    pub async fn district_admin(&self, id: &str) -> Result<Value> {
        self.admin_by_id(Endpoint::DistrictAdmins, id).await
    }

    pub async fn region_admin(&self, id: &str) -> Result<Value> {
        self.admin_by_id(Endpoint::RegionAdmins, id).await
    }

    /// Edit a district admin. `changes` is merged over `{id}`.
    pub async fn update_district_admin(&self, id: &str, changes: Value) -> Result<Value> {
        self.update_admin(Endpoint::DistrictAdmins, id, changes)
            .await
    }

    pub async fn update_region_admin(&self, id: &str, changes: Value) -> Result<Value> {
        self.update_admin(Endpoint::RegionAdmins, id, changes).await
    }

    async fn admin_by_id(&self, endpoint: Endpoint, id: &str) -> Result<Value> {
        let url = self.endpoints.url_with(endpoint, &[("id", id)]);
        self.get_records(url)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("{} {}", endpoint.path(), id)))
    }

    async fn update_admin(&self, endpoint: Endpoint, id: &str, changes: Value) -> Result<Value> {
        let mut body = serde_json::Map::new();
        body.insert("id".to_string(), id_value(id));
        match changes {
            Value::Object(fields) => body.extend(fields.into_iter().filter(|(k, _)| k != "id")),
            Value::Null => {}
            _ => {
                return Err(AppError::invalid_field(
                    "changes",
                    "Changes must be a JSON object",
                ))
            }
        }

        let url = self.endpoints.url(endpoint);
        self.send(RequestDescriptor::put(url).json(Value::Object(body)))
            .await
    }
}
