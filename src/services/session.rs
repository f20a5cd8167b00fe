// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle: login, token refresh and logout.
//!
//! Handles:
//! - Credential exchange and role verification
//! - Persisting the session before publishing it to subscribers
//! - Serialized token refresh with double-checked locking
//! - Clearing the session on logout or expiry

use crate::db::SessionStore;
use crate::error::{server_message, AppError, Result};
use crate::models::session::LoginRequest;
use crate::models::{Credentials, LoginResponse, Session};
use crate::services::endpoints::{Endpoint, EndpointResolver};
use serde_json::{json, Value};
use tokio::sync::{watch, Mutex};

/// Shown when the server rejects credentials without saying why.
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

/// Owner of the single live session.
///
/// Reads are synchronous. Writes go to storage first, then to subscribers.
pub struct SessionManager {
    http: reqwest::Client,
    endpoints: EndpointResolver,
    store: SessionStore,
    state: watch::Sender<Option<Session>>,
    /// Serializes token refresh.
    refresh_lock: Mutex<()>,
}

impl SessionManager {
    /// Restore any persisted session.
    ///
    /// Unreadable storage is logged and treated as logged out.
    pub async fn open(
        http: reqwest::Client,
        endpoints: EndpointResolver,
        store: SessionStore,
    ) -> Self {
        let initial = match store.load().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable stored session");
                None
            }
        };

        if let Some(session) = &initial {
            tracing::debug!(role = %session.role, "Restored session");
        }

        let (state, _rx) = watch::channel(initial);
        Self {
            http,
            endpoints,
            store,
            state,
            refresh_lock: Mutex::new(()),
        }
    }

    /// The live session, if any.
    pub fn current_session(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    /// Current access token, if logged in.
    pub fn access_token(&self) -> Option<String> {
        self.state
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    /// Observe every session change (login, refresh, logout).
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }

    // ─── Login / Logout ──────────────────────────────────────────────────────

    /// Exchange credentials for a session.
    ///
    /// A response whose role differs from the requested one is rejected as
    /// bad credentials.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let mut missing = crate::error::FieldErrors::new();
        if credentials.email_or_phone.trim().is_empty() {
            missing.insert(
                "email_or_phone".to_string(),
                "Email or phone is required".to_string(),
            );
        }
        if credentials.password.is_empty() {
            missing.insert("password".to_string(), "Password is required".to_string());
        }
        if !missing.is_empty() {
            return Err(AppError::Validation(missing));
        }

        let body = LoginRequest {
            email_or_phone: credentials.email_or_phone.trim(),
            password: &credentials.password,
        };

        let response = self
            .http
            .post(self.endpoints.url(Endpoint::Login))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::info!(status = %status, role = %credentials.role, "Login rejected");
            let message = server_message(&text).unwrap_or_else(|| LOGIN_FAILED.to_string());
            return Err(AppError::Auth(message));
        }

        let payload: Value = serde_json::from_str(&text)
            .map_err(|e| AppError::MalformedResponse(format!("login: {}", e)))?;
        let login: LoginResponse = serde_json::from_value(payload)
            .map_err(|e| AppError::MalformedResponse(format!("login: {}", e)))?;

        let session = login.into_session(credentials.role).ok_or_else(|| {
            tracing::info!(requested = %credentials.role, "Login role mismatch");
            AppError::Auth(format!(
                "Invalid UserName or Password for the selected role: {}. Please check your credentials and try again.",
                credentials.role
            ))
        })?;

        self.store.save(&session).await?;
        self.state.send_replace(Some(session.clone()));

        tracing::info!(role = %session.role, "Logged in");
        Ok(session)
    }

    /// Destroy the session. Never fails; storage errors are only logged.
    pub async fn logout(&self) {
        if let Err(e) = self.store.clear().await {
            tracing::warn!(error = %e, "Failed to clear stored session");
        }
        if self.state.send_replace(None).is_some() {
            tracing::info!("Logged out");
        }
    }

    /// Drop a session that can no longer be refreshed.
    pub async fn expire(&self) {
        tracing::warn!("Session expired, clearing");
        self.logout().await;
    }

    // ─── Token Refresh ───────────────────────────────────────────────────────

    /// Obtain a new access token using the refresh token.
    ///
    /// Returns `None` on any failure, including having no session.
    pub async fn refresh_access_token(&self) -> Option<String> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Refresh after the server rejected `rejected`.
    ///
    /// If another task already replaced that token, the replacement is
    /// returned without a second refresh.
    pub async fn refresh_after_rejection(&self, rejected: Option<&str>) -> Option<String> {
        let _guard = self.refresh_lock.lock().await;

        // Re-check after acquiring the lock.
        let current = self.access_token()?;
        if rejected.is_some_and(|r| r != current) {
            tracing::debug!("Token already refreshed by another request");
            return Some(current);
        }

        self.refresh_locked().await
    }

    /// Caller must hold `refresh_lock`.
    async fn refresh_locked(&self) -> Option<String> {
        let session = self.current_session()?;

        let response = match self
            .http
            .post(self.endpoints.url(Endpoint::TokenRefresh))
            .json(&json!({ "refresh": session.refresh_token }))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Token refresh rejected");
            return None;
        }

        let payload: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh returned invalid JSON");
                return None;
            }
        };

        let Some((access, rotated)) = parse_refresh_payload(&payload) else {
            tracing::warn!("Token refresh response has no access token");
            return None;
        };

        // A logout while the refresh was in flight wins.
        let still_current = self
            .state
            .borrow()
            .as_ref()
            .is_some_and(|s| s.refresh_token == session.refresh_token);
        if !still_current {
            return None;
        }

        let mut updated = session;
        updated.access_token = access.clone();
        if let Some(refresh) = rotated {
            updated.refresh_token = refresh;
        }

        if let Err(e) = self.store.save(&updated).await {
            tracing::error!(error = %e, "Failed to persist refreshed session");
        }
        self.state.send_replace(Some(updated));

        tracing::info!("Access token refreshed");
        Some(access)
    }
}

/// Pull `(access, refresh)` out of a refresh response.
///
/// Accepts `{access}`, `{access_token}`, and either wrapped in a
/// `{success: true, data: {...}}` envelope.
pub fn parse_refresh_payload(payload: &Value) -> Option<(String, Option<String>)> {
    let body = match payload.get("data") {
        Some(data) if payload.get("success").and_then(Value::as_bool) == Some(true) => data,
        _ => payload,
    };

    let token = |keys: &[&str]| {
        keys.iter()
            .filter_map(|k| body.get(*k).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map(str::to_string)
    };

    let access = token(&["access", "access_token"])?;
    let refresh = token(&["refresh", "refresh_token"]);
    Some((access, refresh))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_payload_shapes() {
        let plain = json!({"access": "a1"});
        assert_eq!(parse_refresh_payload(&plain), Some(("a1".into(), None)));

        let named = json!({"access_token": "a2", "refresh": "r2"});
        assert_eq!(
            parse_refresh_payload(&named),
            Some(("a2".into(), Some("r2".into())))
        );

        let wrapped = json!({"success": true, "data": {"access": "a3"}});
        assert_eq!(parse_refresh_payload(&wrapped), Some(("a3".into(), None)));

        assert_eq!(parse_refresh_payload(&json!({"detail": "bad"})), None);
        assert_eq!(parse_refresh_payload(&json!({"access": ""})), None);
    }
}
