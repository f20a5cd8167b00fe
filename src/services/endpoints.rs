// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Backend endpoint catalogue and URL resolution.

use crate::config::Config;
use crate::error::{AppError, Result};
use std::fmt;
use std::str::FromStr;

/// Every backend endpoint the console talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    TokenRefresh,
    Members,
    SocietyDonations,
    Donations,
    ProblemReports,
    DistrictAdmins,
    RegionAdmins,
    DistrictMail,
    RegionMail,
    ActivityItems,
    AssociativeWings,
    LatestUpdates,
    Feedback,
}

impl Endpoint {
    /// Path relative to the base URL. The refresh path is configurable and
    /// resolved separately.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Login => "/api/login/",
            Endpoint::TokenRefresh => crate::config::DEFAULT_TOKEN_REFRESH_PATH,
            Endpoint::Members => "/api/member-reg/",
            Endpoint::SocietyDonations => "/api/donate-society/",
            Endpoint::Donations => "/api/donate/",
            Endpoint::ProblemReports => "/api/report-problem/",
            Endpoint::DistrictAdmins => "/api/district-reg/",
            Endpoint::RegionAdmins => "/api/region-reg/",
            Endpoint::DistrictMail => "/api/district-mail/",
            Endpoint::RegionMail => "/api/region-mail/",
            Endpoint::ActivityItems => "/api/activity-items/",
            Endpoint::AssociativeWings => "/api/associative-wings/",
            Endpoint::LatestUpdates => "/api/latest-update-items/",
            Endpoint::Feedback => "/api/feedback/",
        }
    }

    /// Path of the Hindi variant, for endpoints that have one.
    pub fn hindi_path(&self) -> Option<&'static str> {
        match self {
            Endpoint::DistrictAdmins => Some("/api/district-reg-hindi/"),
            Endpoint::RegionAdmins => Some("/api/region-reg-hindi/"),
            Endpoint::ActivityItems => Some("/api/activity-items-hindi/"),
            Endpoint::AssociativeWings => Some("/api/associative-wings-hindi/"),
            Endpoint::LatestUpdates => Some("/api/latest-update-items-hindi/"),
            _ => None,
        }
    }
}

/// Content language of a create or register call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    English,
    Hindi,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Hindi => "hi",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "hi" | "hindi" => Ok(Locale::Hindi),
            other => Err(AppError::UnsupportedLocale(other.to_string())),
        }
    }
}

/// Joins endpoints with the configured hosts.
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    base_url: String,
    hindi_base_url: Option<String>,
    token_refresh_path: String,
}

impl EndpointResolver {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            hindi_base_url: config
                .hindi_base_url
                .as_ref()
                .map(|u| u.trim_end_matches('/').to_string()),
            token_refresh_path: config.token_refresh_path.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an endpoint.
    pub fn url(&self, endpoint: Endpoint) -> String {
        match endpoint {
            Endpoint::TokenRefresh => self.join(&self.base_url, &self.token_refresh_path),
            other => self.join(&self.base_url, other.path()),
        }
    }

    /// Absolute URL with URL-encoded query parameters.
    pub fn url_with(&self, endpoint: Endpoint, query: &[(&str, &str)]) -> String {
        with_query(self.url(endpoint), query)
    }

    /// URL of an endpoint in the given content language.
    ///
    /// Hindi works only for endpoints with a Hindi variant, and only when a
    /// Hindi host is configured.
    pub fn localized(&self, endpoint: Endpoint, locale: Locale) -> Result<String> {
        match locale {
            Locale::English => Ok(self.url(endpoint)),
            Locale::Hindi => {
                let path = endpoint
                    .hindi_path()
                    .ok_or_else(|| AppError::UnsupportedLocale(locale.code().to_string()))?;
                let base = self
                    .hindi_base_url
                    .as_deref()
                    .ok_or_else(|| AppError::UnsupportedLocale(locale.code().to_string()))?;
                Ok(self.join(base, path))
            }
        }
    }

    fn join(&self, base: &str, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Append URL-encoded query parameters.
pub fn with_query(mut url: String, query: &[(&str, &str)]) -> String {
    for (i, (key, value)) in query.iter().enumerate() {
        let sep = if i == 0 && !url.contains('?') { '?' } else { '&' };
        url.push(sep);
        url.push_str(&urlencoding::encode(key));
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    url
}
