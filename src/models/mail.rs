// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Mail broadcast models.

use super::fields::{first_str, member_identity, MAIL_SENDER_FIELDS};
use super::session::scalar_string;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Header view of a broadcast mail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailSummary {
    /// District admin, region admin or admin that sent the mail
    pub sender: String,
    pub member_ids: Vec<String>,
    pub subject: String,
    pub message: String,
}

impl MailSummary {
    /// Summarize a mail record. Missing fields come back empty.
    pub fn from_record(record: &Value) -> Self {
        Self {
            sender: first_str(record, MAIL_SENDER_FIELDS).unwrap_or_default(),
            member_ids: member_ids(record),
            subject: text_field(record, "subject"),
            message: text_field(record, "message"),
        }
    }
}

fn text_field(record: &Value, field: &str) -> String {
    record
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Recipient ids of a mail record, stringified.
pub fn member_ids(record: &Value) -> Vec<String> {
    record
        .get("member_ids")
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(scalar_string).collect())
        .unwrap_or_default()
}

/// A member that received a given mail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailRecipient {
    pub member: Value,
    pub mail: Value,
}

/// Pair every mail with each member listed in its `member_ids`.
///
/// Mails are visited in order; members in order within each mail.
pub fn mail_recipients(mails: &[Value], members: &[Value]) -> Vec<MailRecipient> {
    let mut out = Vec::new();
    for mail in mails {
        let ids = member_ids(mail);
        if ids.is_empty() {
            continue;
        }
        for member in members {
            let Some(identity) = member_identity(member) else {
                continue;
            };
            if ids.iter().any(|id| *id == identity) {
                out.push(MailRecipient {
                    member: member.clone(),
                    mail: mail.clone(),
                });
            }
        }
    }
    out
}

/// Who a broadcast is sent as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailSender {
    District,
    Region,
}

impl MailSender {
    /// Name of the sender id field in the request body.
    pub fn id_field(&self) -> &'static str {
        match self {
            MailSender::District => "district_admin_id",
            MailSender::Region => "region_admin_id",
        }
    }
}

/// Outgoing broadcast, before the sender id is attached.
#[derive(Debug, Clone, Default, Serialize, Deserialize, validator::Validate)]
pub struct MailDraft {
    #[validate(length(min = 1, message = "Select at least one member"))]
    pub member_ids: Vec<String>,
    #[validate(custom(function = "crate::models::forms::required"))]
    pub subject: String,
    #[validate(custom(function = "crate::models::forms::required"))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_falls_back_to_admin() {
        let mail = json!({"admin": "ADM-1", "member_ids": [5, "MEM/2026/917028"], "subject": "hi"});
        let summary = MailSummary::from_record(&mail);
        assert_eq!(summary.sender, "ADM-1");
        assert_eq!(summary.member_ids, vec!["5", "MEM/2026/917028"]);
        assert_eq!(summary.message, "");

        let mail = json!({"region_admin": "REG/ADM/1", "admin": "ADM-1", "member_ids": [1]});
        assert_eq!(MailSummary::from_record(&mail).sender, "REG/ADM/1");
    }

    #[test]
    fn test_recipients_match_by_string_identity() {
        let mails = vec![
            json!({"subject": "a", "member_ids": ["1", 3]}),
            json!({"subject": "b", "member_ids": []}),
        ];
        let members = vec![
            json!({"id": 1, "full_name": "One"}),
            json!({"member_id": "2"}),
            json!({"unique_id": "3"}),
        ];
        let pairs = mail_recipients(&mails, &members);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].member["full_name"], "One");
        assert_eq!(pairs[1].member["unique_id"], "3");
    }
}
