// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Citizen problem reports.

use super::{id_value, write_result, NgoApi};
use crate::error::Result;
use crate::models::fields::first_str;
use crate::models::forms::{check, ProblemReportForm, ProblemStatusUpdate};
use crate::models::Role;
use crate::services::{Endpoint, MultipartForm, RequestDescriptor};
use serde_json::{json, Value};

impl NgoApi {
    /// Submit a report from the public site. No login needed.
    ///
    /// Returns the id the backend assigned, if it sent one.
    pub async fn report_problem(&self, form: &ProblemReportForm) -> Result<Option<String>> {
        check(form)?;

        let body = MultipartForm::new()
            .text("full_name", form.full_name.trim())
            .text("email", form.email.trim())
            .text("phone", form.phone.trim())
            .text("problem_nature", &form.problem_nature)
            .text("department", &form.department)
            .text("description", form.description.trim())
            .text("district", &form.district)
            .maybe_file("report_image", form.report_image.as_ref());

        let url = self.endpoints.url(Endpoint::ProblemReports);
        let response = self
            .gateway
            .fetch(&RequestDescriptor::post(url).multipart(body))
            .await?;
        let created = write_result(response)?;

        let id = first_str(&created, &["id", "problem_id"]);
        tracing::info!(problem_id = ?id, "Problem report submitted");
        Ok(id)
    }

    pub async fn problem_reports(&self) -> Result<Vec<Value>> {
        self.get_records(self.endpoints.url(Endpoint::ProblemReports))
            .await
    }

    /// Change a report's status. Admins only.
    pub async fn update_problem_status(
        &self,
        id: &str,
        update: &ProblemStatusUpdate,
    ) -> Result<Value> {
        self.require_role(&[Role::Admin])?;
        check(update)?;

        let url = self.endpoints.url(Endpoint::ProblemReports);
        let body = json!({
            "id": id_value(id),
            "status": update.status,
            "remark": update.remark,
        });
        self.send(RequestDescriptor::put(url).json(body)).await
    }

    /// Delete a report. Admins only.
    pub async fn delete_problem_report(&self, id: &str) -> Result<()> {
        self.require_role(&[Role::Admin])?;

        let url = self
            .endpoints
            .url_with(Endpoint::ProblemReports, &[("id", id)]);
        self.send(RequestDescriptor::delete(url).json(json!({ "id": id_value(id) })))
            .await?;
        tracing::info!(problem_id = %id, "Problem report deleted");
        Ok(())
    }
}
