// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated request gateway.
//!
//! Every authenticated call goes through [`Gateway::auth_fetch`], which
//! attaches the bearer token and performs at most one refresh-and-retry
//! cycle when the server answers 401.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::forms::Upload;
use crate::services::cancel::ViewScope;
use crate::services::normalize::normalize_list;
use crate::services::session::SessionManager;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Build the HTTP client shared by the session manager and the gateway.
pub fn http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .user_agent(concat!("ngo-console/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))
}

/// Serialize a request body.
pub fn to_json<T: Serialize>(body: &T) -> Result<Value> {
    serde_json::to_value(body)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode request: {}", e)))
}

// ─── Request ─────────────────────────────────────────────────────────────────

/// Multipart form held in memory so it can be rebuilt for a retry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, Upload)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl ToString) -> Self {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    pub fn file(mut self, name: &str, upload: Upload) -> Self {
        self.files.push((name.to_string(), upload));
        self
    }

    /// Attach a file only when present.
    pub fn maybe_file(self, name: &str, upload: Option<&Upload>) -> Self {
        match upload {
            Some(u) => self.file(name, u.clone()),
            None => self,
        }
    }

    fn build(&self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        for (name, upload) in &self.files {
            let mut part = reqwest::multipart::Part::bytes(upload.bytes.clone())
                .file_name(upload.file_name.clone());
            if let Some(mime) = &upload.mime {
                part = part
                    .mime_str(mime)
                    .map_err(|e| AppError::invalid_field(name, e.to_string()))?;
            }
            form = form.part(name.clone(), part);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

/// One HTTP call, built per request and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Bearer token the caller put in the Authorization header, if any.
    fn caller_bearer(&self) -> Option<&str> {
        self.header_value("authorization").map(|v| {
            v.strip_prefix("Bearer ")
                .or_else(|| v.strip_prefix("bearer "))
                .unwrap_or(v)
        })
    }
}

// ─── Response ────────────────────────────────────────────────────────────────

/// A completed HTTP exchange with its body fully read.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Classify a non-2xx status into the error taxonomy.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(AppError::from_status(self.status, &self.text()))
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| AppError::MalformedResponse(e.to_string()))
    }

    pub fn json_value(&self) -> Result<Value> {
        self.json()
    }

    /// Status check, JSON parse, then collection normalization.
    pub fn records(self) -> Result<Vec<Value>> {
        let ok = self.error_for_status()?;
        Ok(normalize_list(ok.json_value()?))
    }
}

// ─── Gateway ─────────────────────────────────────────────────────────────────

/// Sends requests, attaching credentials from the session manager.
#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    session: Arc<SessionManager>,
}

impl Gateway {
    pub fn new(http: reqwest::Client, session: Arc<SessionManager>) -> Self {
        Self { http, session }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Unauthenticated call. No token, no retry.
    pub async fn fetch(&self, request: &RequestDescriptor) -> Result<ApiResponse> {
        self.execute(request, None).await
    }

    /// Authenticated call with one refresh-and-retry on 401.
    ///
    /// A second 401, or a failed refresh, clears the session and yields
    /// [`AppError::SessionExpired`]. Other statuses are returned unchanged.
    pub async fn auth_fetch(&self, request: &RequestDescriptor) -> Result<ApiResponse> {
        // The session token at start decides whether a refresh is still needed.
        let session_token = self.session.access_token();
        let bearer = match request.caller_bearer() {
            Some(_) => None,
            None => session_token.as_deref(),
        };

        let first = self.execute(request, bearer).await?;
        if first.status != StatusCode::UNAUTHORIZED {
            return Ok(first);
        }

        tracing::info!(method = %request.method, url = %request.url, "Got 401, refreshing token");

        let Some(token) = self
            .session
            .refresh_after_rejection(session_token.as_deref())
            .await
        else {
            self.session.expire().await;
            return Err(AppError::SessionExpired);
        };

        let retry = self.execute(request, Some(&token)).await?;
        if retry.status == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %request.url, "Retry rejected after refresh");
            self.session.expire().await;
            return Err(AppError::SessionExpired);
        }
        Ok(retry)
    }

    /// [`auth_fetch`](Self::auth_fetch) bound to a view's lifetime.
    pub async fn auth_fetch_in(
        &self,
        request: &RequestDescriptor,
        scope: &ViewScope,
    ) -> Result<ApiResponse> {
        scope.run(self.auth_fetch(request)).await
    }

    /// Perform one network attempt. A `bearer` replaces any caller
    /// Authorization header.
    async fn execute(&self, request: &RequestDescriptor, bearer: Option<&str>) -> Result<ApiResponse> {
        let mut builder = self.http.request(request.method.clone(), &request.url);

        for (name, value) in &request.headers {
            if bearer.is_some() && name.eq_ignore_ascii_case("authorization") {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(v) => builder.json(v),
            RequestBody::Multipart(form) => builder.multipart(form.build()?),
        };

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %request.method, url = %request.url, error = %e, "Request failed");
            AppError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = status.as_u16(),
            bytes = body.len(),
            "API response"
        );

        Ok(ApiResponse { status, body })
    }
}
