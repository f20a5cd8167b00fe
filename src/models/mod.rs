// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the console.

pub mod dashboard;
pub mod feedback;
pub mod fields;
pub mod forms;
pub mod mail;
pub mod session;

pub use dashboard::{DashboardSummary, DonationCounts, MemberCounts, Section};
pub use feedback::Feedback;
pub use mail::{MailDraft, MailRecipient, MailSender, MailSummary};
pub use session::{AllocatedDistrict, Credentials, LoginResponse, Role, Session};
