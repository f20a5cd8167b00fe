// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Form models with pre-flight validation.
//!
//! Every form is checked locally before any request is built. Each field
//! reports at most one message.

use chrono::{Local, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

use crate::error::{AppError, Result};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern"));
static STRICT_EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("strict email pattern"));
static TEN_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern"));
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]+$").expect("name pattern"));
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)*/?$").expect("url pattern")
});

/// Smallest accepted image upload.
pub const MIN_IMAGE_BYTES: usize = 50 * 1024;
/// Largest accepted image upload.
pub const MAX_IMAGE_BYTES: usize = 100 * 1024;

fn invalid(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validate and convert the errors into the client error type.
pub fn check<T: Validate>(form: &T) -> Result<()> {
    form.validate().map_err(AppError::from)
}

// ─── Field checks ────────────────────────────────────────────────────────────

pub fn required(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "This field is required"));
    }
    Ok(())
}

pub fn email(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "Email is required"));
    }
    if !EMAIL_RE.is_match(value) {
        return Err(invalid("email", "Email is invalid"));
    }
    Ok(())
}

pub fn strict_email(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "Email is required"));
    }
    if !STRICT_EMAIL_RE.is_match(value) {
        return Err(invalid("email", "Please enter a valid email address"));
    }
    Ok(())
}

/// Ten digits once separators are stripped.
pub fn phone(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "Phone number is required"));
    }
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 10 {
        return Err(invalid("phone", "Phone number should be 10 digits"));
    }
    Ok(())
}

/// Exactly ten digits, nothing else.
pub fn strict_phone(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "Phone number is required"));
    }
    if !TEN_DIGITS_RE.is_match(value) {
        return Err(invalid("phone", "Phone number must be exactly 10 digits"));
    }
    Ok(())
}

pub fn password(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "Password is required"));
    }
    if value.chars().count() < 6 {
        return Err(invalid(
            "length",
            "Password should be at least 6 characters",
        ));
    }
    Ok(())
}

pub fn person_name(value: &str) -> std::result::Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid("required", "Full name is required"));
    }
    if trimmed.chars().count() < 2 {
        return Err(invalid("length", "Full name must be at least 2 characters"));
    }
    if !NAME_RE.is_match(value) {
        return Err(invalid("alpha", "Full name should contain only alphabets"));
    }
    Ok(())
}

pub fn description(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "Description is required"));
    }
    if value.trim().chars().count() < 10 {
        return Err(invalid(
            "length",
            "Description must be at least 10 characters",
        ));
    }
    Ok(())
}

pub fn objective(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "Objective is required"));
    }
    if value.trim().chars().count() < 10 {
        return Err(invalid("length", "Objective must be at least 10 characters"));
    }
    Ok(())
}

pub fn title(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "Title is required"));
    }
    if value.chars().count() < 3 {
        return Err(invalid("length", "Title must be at least 3 characters"));
    }
    Ok(())
}

pub fn link(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "Link is required"));
    }
    if !URL_RE.is_match(value) {
        return Err(invalid("url", "Please enter a valid URL"));
    }
    Ok(())
}

pub fn districts(value: &[String]) -> std::result::Result<(), ValidationError> {
    if value.iter().all(|d| d.trim().is_empty()) {
        return Err(invalid("required", "District selection is required"));
    }
    Ok(())
}

pub fn image_size(file: &Upload) -> std::result::Result<(), ValidationError> {
    let size = file.bytes.len();
    if !(MIN_IMAGE_BYTES..=MAX_IMAGE_BYTES).contains(&size) {
        return Err(invalid(
            "image_size",
            format!(
                "Image size must be between 50KB and 100KB. File size: {:.2} KB.",
                size as f64 / 1024.0
            ),
        ));
    }
    Ok(())
}

pub fn activity_fee(value: &str) -> std::result::Result<(), ValidationError> {
    match value.trim().parse::<f64>() {
        Ok(fee) if fee.is_finite() && fee > 0.0 => Ok(()),
        _ => Err(invalid("fee", "Valid activity fee is required")),
    }
}

pub fn future_date_time(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("required", "Activity date and time is required"));
    }
    match parse_local_date_time(value) {
        Some(when) if when >= Local::now().naive_local() => Ok(()),
        Some(_) => Err(invalid("past", "Activity date cannot be in the past")),
        None => Err(invalid("format", "Activity date and time is invalid")),
    }
}

/// Parse a `datetime-local` style value (`2026-03-01T10:30`).
pub fn parse_local_date_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

// ─── Uploads ─────────────────────────────────────────────────────────────────

/// A file held in memory so it can be re-sent on retry.
///
/// Serializes as its name and type only; validation errors carry it as a
/// parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Upload {
    pub file_name: String,
    pub mime: Option<String>,
    #[serde(skip_serializing)]
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).map(str::to_string);
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::invalid_field("image", format!("Cannot read {}: {}", path.display(), e))
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, bytes))
    }
}

fn mime_for(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

// ─── Forms ───────────────────────────────────────────────────────────────────

/// District admin registration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DistrictAdminForm {
    #[validate(custom(function = "required"))]
    pub full_name: String,
    #[validate(custom(function = "email"))]
    pub email: String,
    #[validate(custom(function = "phone"))]
    pub phone: String,
    #[validate(custom(function = "password"))]
    pub password: String,
    #[validate(custom(function = "required"))]
    pub allocated_district: String,
}

/// Region admin registration. A region spans several districts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RegionAdminForm {
    #[validate(custom(function = "required"))]
    pub full_name: String,
    #[validate(custom(function = "email"))]
    pub email: String,
    #[validate(custom(function = "phone"))]
    pub phone: String,
    #[validate(custom(function = "password"))]
    pub password: String,
    #[validate(custom(function = "districts"))]
    pub allocated_district: Vec<String>,
}

/// Public problem report.
#[derive(Debug, Clone, Default, Validate)]
pub struct ProblemReportForm {
    #[validate(custom(function = "person_name"))]
    pub full_name: String,
    #[validate(custom(function = "strict_email"))]
    pub email: String,
    #[validate(custom(function = "strict_phone"))]
    pub phone: String,
    #[validate(custom(function = "required"))]
    pub problem_nature: String,
    #[validate(custom(function = "required"))]
    pub department: String,
    #[validate(custom(function = "required"))]
    pub district: String,
    #[validate(custom(function = "description"))]
    pub description: String,
    #[validate(custom(function = "image_size"))]
    pub report_image: Option<Upload>,
}

/// New activity.
#[derive(Debug, Clone, Default, Validate)]
pub struct ActivityForm {
    #[validate(custom(function = "required"))]
    pub activity_name: String,
    #[validate(custom(function = "objective"))]
    pub objective: String,
    #[validate(custom(function = "future_date_time"))]
    pub activity_date_time: String,
    #[validate(custom(function = "required"))]
    pub venue: String,
    #[validate(custom(function = "activity_fee"))]
    pub activity_fee: String,
    #[validate(custom(function = "required"))]
    pub allocated_district: String,
    #[validate(custom(function = "image_size"))]
    pub image: Option<Upload>,
}

/// Timing flags sent with an activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActivityTiming {
    pub is_past: bool,
    pub is_present: bool,
    pub is_upcoming: bool,
}

impl ActivityTiming {
    /// Classify `when` relative to `now`. Present means within a day and
    /// not yet started.
    pub fn at(when: NaiveDateTime, now: NaiveDateTime) -> Self {
        let is_past = when < now;
        let within_day = (when - now).num_milliseconds().abs() < 24 * 60 * 60 * 1000;
        Self {
            is_past,
            is_present: within_day && !is_past,
            is_upcoming: when > now,
        }
    }
}

impl ActivityForm {
    pub fn timing(&self) -> ActivityTiming {
        parse_local_date_time(&self.activity_date_time)
            .map(|when| ActivityTiming::at(when, Local::now().naive_local()))
            .unwrap_or_default()
    }
}

/// New associative wing.
#[derive(Debug, Clone, Default, Validate)]
pub struct WingForm {
    #[validate(custom(function = "required"))]
    pub organization_name: String,
    #[validate(custom(function = "required"))]
    pub native_wing: String,
    #[validate(custom(function = "required"))]
    pub short_description: String,
    #[validate(custom(function = "required"))]
    pub address: String,
    #[validate(custom(function = "required"))]
    pub contact_person_name: String,
    #[validate(custom(function = "email"))]
    pub email: String,
    #[validate(custom(function = "phone"))]
    pub phone: String,
    #[validate(custom(function = "image_size"))]
    pub image: Option<Upload>,
}

/// Latest-update link.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LatestUpdateForm {
    #[validate(custom(function = "title"))]
    pub title: String,
    #[validate(custom(function = "link"))]
    pub link: String,
}

/// Status change for a problem report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProblemStatusUpdate {
    #[validate(custom(function = "required"))]
    pub status: String,
    #[serde(default)]
    pub remark: String,
}
