// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent presentation outcomes.

use reqwest::StatusCode;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Field name to user-facing message, ordered by field name.
pub type FieldErrors = BTreeMap<String, String>;

/// Where the console sends the user once the session can't be recovered.
pub const LOGIN_ROUTE: &str = "/Login";

/// Delay before the forced redirect to the login view.
pub const SESSION_EXPIRED_REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Client error type covering transport, HTTP status, and local failures.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Auth(String),

    #[error("Session expired. Please log in again.")]
    SessionExpired,

    #[error("{0}")]
    Permission(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Validation failed: {}", summarize(.0))]
    Validation(FieldErrors),

    #[error("Server returned an invalid response: {0}")]
    MalformedResponse(String),

    #[error("Request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// The single presentation outcome a page renders for an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Inline messages next to form fields.
    FieldErrors(FieldErrors),
    /// A banner. Persistent banners can't be dismissed.
    Banner { message: String, dismissible: bool },
    /// Forced navigation after a delay.
    Redirect { to: &'static str, after: Duration },
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{}: {}", field, msg))
        .collect::<Vec<_>>()
        .join(", ")
}

impl AppError {
    pub const PERMISSION_DENIED: &'static str =
        "Permission denied. You may not have the required role to access this feature.";
    pub const ENDPOINT_NOT_FOUND: &'static str =
        "API endpoint not found. Please contact the administrator.";
    pub const INVALID_RESPONSE: &'static str = "The server returned an invalid response.";

    /// Single-field validation error.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), message.into());
        AppError::Validation(errors)
    }

    /// Classify a non-success HTTP response.
    ///
    /// The message is taken from the JSON body's `message`, `detail` or
    /// `error` field when present, otherwise from the raw body text.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = server_message(body).unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        });

        match status.as_u16() {
            401 => AppError::Auth(message),
            403 => AppError::Permission(message),
            404 => AppError::NotFound(message),
            code if code >= 500 => AppError::Server {
                status: code,
                message,
            },
            code => AppError::Http {
                status: code,
                message,
            },
        }
    }

    /// True when the user must log in again.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, AppError::SessionExpired)
    }

    /// Map this error to exactly one presentation outcome.
    pub fn notice(&self) -> Notice {
        match self {
            AppError::Validation(fields) => Notice::FieldErrors(fields.clone()),
            AppError::SessionExpired => Notice::Redirect {
                to: LOGIN_ROUTE,
                after: SESSION_EXPIRED_REDIRECT_DELAY,
            },
            AppError::Permission(msg) => Notice::Banner {
                message: msg.clone(),
                dismissible: false,
            },
            AppError::NotFound(_) => Notice::Banner {
                message: Self::ENDPOINT_NOT_FOUND.to_string(),
                dismissible: true,
            },
            AppError::Server { message, .. } => Notice::Banner {
                message: message.clone(),
                dismissible: true,
            },
            AppError::MalformedResponse(_) => Notice::Banner {
                message: Self::INVALID_RESPONSE.to_string(),
                dismissible: true,
            },
            other => Notice::Banner {
                message: other.to_string(),
                dismissible: true,
            },
        }
    }

    /// The text a user sees for this error, flattened to one line.
    pub fn notice_message(&self) -> String {
        match self.notice() {
            Notice::FieldErrors(fields) => summarize(&fields),
            Notice::Banner { message, .. } => message,
            Notice::Redirect { .. } => self.to_string(),
        }
    }
}

/// Pull a human-readable message out of a JSON error body.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "detail", "error"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .unwrap_or_default();
                (field.to_string(), message)
            })
            .collect();
        AppError::Validation(fields)
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;
