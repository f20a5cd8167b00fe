// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Session and login models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Console role, kebab-case on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    DistrictAdmin,
    RegionAdmin,
    Member,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Admin,
        Role::DistrictAdmin,
        Role::RegionAdmin,
        Role::Member,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::DistrictAdmin => "district-admin",
            Role::RegionAdmin => "region-admin",
            Role::Member => "member",
        }
    }

    /// Dashboard route shown after a successful login.
    pub fn landing_route(&self) -> &'static str {
        match self {
            Role::Admin => "/DashBoard",
            Role::DistrictAdmin => "/DistrictRegistration",
            Role::RegionAdmin => "/RegionDashBoard",
            Role::Member => "/UserProfile",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| format!("unknown role: {}", s))
    }
}

/// Jurisdiction granted to a district or region admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllocatedDistrict {
    One(String),
    Many(Vec<String>),
}

impl AllocatedDistrict {
    /// Interpret a loosely typed backend value. Numbers become strings.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(AllocatedDistrict::One(s.clone())),
            Value::Number(n) => Some(AllocatedDistrict::One(n.to_string())),
            Value::Array(items) => Some(AllocatedDistrict::Many(
                items.iter().filter_map(scalar_string).collect(),
            )),
            _ => None,
        }
    }

    /// The allocated districts in order, trimmed, without blanks or repeats.
    ///
    /// A single string may hold a comma-separated list.
    pub fn districts(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            AllocatedDistrict::One(s) => s.split(',').collect(),
            AllocatedDistrict::Many(list) => list.iter().map(String::as_str).collect(),
        };

        let mut out: Vec<String> = Vec::with_capacity(raw.len());
        for d in raw.into_iter().map(str::trim).filter(|d| !d.is_empty()) {
            if !out.iter().any(|seen| seen == d) {
                out.push(d.to_string());
            }
        }
        out
    }
}

/// The authenticated identity of the console user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub role: Role,
    pub unique_id: String,
    #[serde(default)]
    pub allocated_district: Option<AllocatedDistrict>,
    /// Remaining login response fields (name, email, ...)
    #[serde(default)]
    pub profile: Map<String, Value>,
}

impl Session {
    /// Allocated districts as an ordered set. Empty when none are assigned.
    pub fn districts(&self) -> Vec<String> {
        self.allocated_district
            .as_ref()
            .map(AllocatedDistrict::districts)
            .unwrap_or_default()
    }

    /// Expiry of the access token, read from its `exp` claim.
    ///
    /// The signature is not checked; this is for display only.
    pub fn access_expires_at(&self) -> Option<DateTime<Utc>> {
        access_token_expiry(&self.access_token)
    }

    /// Display name from the profile, if the backend sent one.
    pub fn display_name(&self) -> Option<&str> {
        ["full_name", "name", "email"]
            .iter()
            .find_map(|k| self.profile.get(*k).and_then(Value::as_str))
    }
}

#[derive(Deserialize)]
struct ExpiryClaims {
    exp: i64,
}

/// Decode the `exp` claim of a JWT without verifying it.
pub fn access_token_expiry(token: &str) -> Option<DateTime<Utc>> {
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    DateTime::from_timestamp(data.claims.exp, 0)
}

/// Credentials for the login form.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email_or_phone: String,
    pub password: String,
    pub role: Role,
}

/// Body POSTed to the login endpoint. Same shape for every role.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email_or_phone: &'a str,
    pub password: &'a str,
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub unique_id: String,
    #[serde(default, deserialize_with = "lenient_district")]
    pub allocated_district: Option<AllocatedDistrict>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl LoginResponse {
    /// Build a session if the response role matches the requested one.
    pub fn into_session(self, requested: Role) -> Option<Session> {
        let role = self.role.as_deref()?.parse::<Role>().ok()?;
        if role != requested {
            return None;
        }
        Some(Session {
            access_token: self.access,
            refresh_token: self.refresh,
            role,
            unique_id: self.unique_id,
            allocated_district: self.allocated_district,
            profile: self.profile,
        })
    }
}

/// Stringify a scalar JSON value; `None` for null, objects and arrays.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_string(&value).unwrap_or_default())
}

fn lenient_district<'de, D>(deserializer: D) -> Result<Option<AllocatedDistrict>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(AllocatedDistrict::from_value(&value))
}
