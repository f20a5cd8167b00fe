// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed resource operations used by the console pages.
//!
//! [`NgoApi`] bundles the gateway, endpoint resolver and session manager.
//! Each submodule adds the operations for one backend resource.

mod admins;
mod content;
mod dashboard;
mod donations;
mod feedback;
mod mail;
mod members;
mod problems;

pub use donations::DonationKind;

use crate::config::Config;
use crate::db::SessionStore;
use crate::error::{AppError, FieldErrors, Result};
use crate::models::{Credentials, Role, Session};
use crate::services::gateway::{http_client, ApiResponse};
use crate::services::{EndpointResolver, Gateway, RequestDescriptor, SessionManager};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;

/// Client for the NGO backend.
#[derive(Clone)]
pub struct NgoApi {
    gateway: Gateway,
    endpoints: EndpointResolver,
    feedback_limit: usize,
}

impl NgoApi {
    /// Build the client and restore any persisted session.
    pub async fn connect(config: &Config, store: SessionStore) -> Result<Self> {
        let http = http_client(config)?;
        let endpoints = EndpointResolver::new(config);
        let session = Arc::new(SessionManager::open(http.clone(), endpoints.clone(), store).await);

        Ok(Self {
            gateway: Gateway::new(http, session),
            endpoints,
            feedback_limit: config.feedback_limit,
        })
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub fn session(&self) -> &SessionManager {
        self.gateway.session()
    }

    pub fn endpoints(&self) -> &EndpointResolver {
        &self.endpoints
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        self.session().login(credentials).await
    }

    pub async fn logout(&self) {
        self.session().logout().await
    }

    /// The live session, or `SessionExpired` when logged out.
    fn require_session(&self) -> Result<Session> {
        self.session()
            .current_session()
            .ok_or(AppError::SessionExpired)
    }

    /// Fail locally unless the session has one of `roles`.
    fn require_role(&self, roles: &[Role]) -> Result<Session> {
        let session = self.require_session()?;
        if !roles.contains(&session.role) {
            tracing::info!(role = %session.role, "Operation not permitted for role");
            return Err(AppError::Permission(
                AppError::PERMISSION_DENIED.to_string(),
            ));
        }
        Ok(session)
    }

    /// Authenticated GET of a collection.
    async fn get_records(&self, url: String) -> Result<Vec<Value>> {
        self.gateway
            .auth_fetch(&RequestDescriptor::get(url))
            .await?
            .records()
    }

    /// Authenticated write; returns the response body (null when empty).
    async fn send(&self, request: RequestDescriptor) -> Result<Value> {
        let response = self.gateway.auth_fetch(&request).await?;
        write_result(response)
    }
}

/// Record id as JSON: numeric ids go out as numbers.
pub(crate) fn id_value(id: &str) -> Value {
    id.trim()
        .parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(id.to_string()))
}

/// Interpret the response to a create, update or delete.
///
/// A 400 whose body maps field names to messages becomes a validation
/// error so forms can show the messages inline.
pub(crate) fn write_result(response: ApiResponse) -> Result<Value> {
    if response.status == StatusCode::BAD_REQUEST {
        if let Some(fields) = response
            .json_value()
            .ok()
            .as_ref()
            .and_then(server_field_errors)
        {
            return Err(AppError::Validation(fields));
        }
    }

    let response = response.error_for_status()?;
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    response.json_value()
}

/// `{"field": ["msg", ...]}` or `{"field": "msg"}`, as DRF reports them.
fn server_field_errors(body: &Value) -> Option<FieldErrors> {
    let obj = body.as_object()?;
    if obj.is_empty() || ["message", "detail", "error"].iter().any(|k| obj.contains_key(*k)) {
        return None;
    }

    let mut fields = FieldErrors::new();
    for (field, value) in obj {
        let message = match value {
            Value::String(s) => s.clone(),
            Value::Array(items) => items.iter().find_map(Value::as_str)?.to_string(),
            _ => return None,
        };
        fields.insert(field.clone(), message);
    }
    Some(fields)
}
