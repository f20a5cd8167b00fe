// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public testimonials.

use super::NgoApi;
use crate::error::Result;
use crate::models::feedback::accepted_feedback;
use crate::models::Feedback;
use crate::services::{Endpoint, RequestDescriptor};

impl NgoApi {
    /// Accepted testimonials, newest first, capped at the configured limit.
    pub async fn public_feedback(&self) -> Result<Vec<Feedback>> {
        let url = self.endpoints.url(Endpoint::Feedback);
        let records = self
            .gateway
            .fetch(&RequestDescriptor::get(url))
            .await?
            .records()?;

        accepted_feedback(records, self.feedback_limit)
            .into_iter()
            .map(|r| {
                serde_json::from_value(r).map_err(|e| {
                    crate::error::AppError::MalformedResponse(format!("feedback: {}", e))
                })
            })
            .collect()
    }
}
