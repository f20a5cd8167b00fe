// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Broadcast mail to members.

use super::NgoApi;
use crate::error::Result;
use crate::models::forms::check;
use crate::models::{MailDraft, MailSender, MailSummary};
use crate::services::{filter_by_scope, latest, Endpoint, RequestDescriptor};
use serde_json::{json, Value};

impl MailSender {
    fn endpoint(&self) -> Endpoint {
        match self {
            MailSender::District => Endpoint::DistrictMail,
            MailSender::Region => Endpoint::RegionMail,
        }
    }
}

impl NgoApi {
    pub async fn send_district_mail(
        &self,
        draft: &MailDraft,
        sender_id: Option<&str>,
    ) -> Result<Value> {
        self.send_mail(MailSender::District, draft, sender_id).await
    }

    pub async fn send_region_mail(&self, draft: &MailDraft, sender_id: Option<&str>) -> Result<Value> {
        self.send_mail(MailSender::Region, draft, sender_id).await
    }

    /// Send a broadcast. The sender id defaults to the session's id.
    pub async fn send_mail(
        &self,
        sender: MailSender,
        draft: &MailDraft,
        sender_id: Option<&str>,
    ) -> Result<Value> {
        check(draft)?;

        let sender_id = match sender_id {
            Some(id) => id.to_string(),
            None => self.require_session()?.unique_id,
        };

        let mut body = json!({
            "member_ids": draft.member_ids,
            "subject": draft.subject.trim(),
            "message": draft.message.trim(),
        });
        body[sender.id_field()] = Value::String(sender_id);

        let url = self.endpoints.url(sender.endpoint());
        let sent = self.send(RequestDescriptor::post(url).json(body)).await?;
        tracing::info!(
            recipients = draft.member_ids.len(),
            sender = ?sender,
            "Mail sent"
        );
        Ok(sent)
    }

    /// District mail history, limited to what the session may see.
    pub async fn district_mail_history(&self) -> Result<Vec<Value>> {
        let session = self.require_session()?;
        let records = self
            .get_records(self.endpoints.url(Endpoint::DistrictMail))
            .await?;
        Ok(filter_by_scope(records, &session))
    }

    pub async fn region_mail_history(&self) -> Result<Vec<Value>> {
        self.get_records(self.endpoints.url(Endpoint::RegionMail))
            .await
    }

    pub async fn latest_district_mail(&self) -> Result<Option<MailSummary>> {
        let history = self.district_mail_history().await?;
        Ok(latest(&history).map(MailSummary::from_record))
    }

    pub async fn latest_region_mail(&self) -> Result<Option<MailSummary>> {
        let history = self.region_mail_history().await?;
        Ok(latest(&history).map(MailSummary::from_record))
    }
}
