// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! NGO Console: client core for the NGO administration backend
//!
//! This crate provides the session manager, authenticated request gateway,
//! response normalization and role-scoped filtering that every console
//! page depends on, plus typed operations for each backend resource.

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use api::NgoApi;
pub use error::{AppError, Notice, Result};
