// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use clap::Subcommand;
use serde_json::{json, Value};
use std::io::BufRead;

use super::output::{emit, record_lines};
use super::{Commands, OutputFormat};
use crate::api::NgoApi;
use crate::error::AppError;
use crate::models::forms::ProblemStatusUpdate;
use crate::models::mail::mail_recipients;
use crate::models::{Credentials, MailDraft, MailSender, Role, Section};

#[derive(Subcommand)]
pub enum ProblemCommands {
    #[command(about = "List problem reports")]
    List,

    #[command(about = "Change the status of a report (admin only)")]
    Status {
        #[arg(help = "Report id")]
        id: String,
        #[arg(help = "New status")]
        status: String,
        #[arg(long, default_value = "", help = "Remark shown with the status")]
        remark: String,
    },

    #[command(about = "Delete a report (admin only)")]
    Delete {
        #[arg(help = "Report id")]
        id: String,
    },
}

#[derive(Subcommand)]
pub enum MailCommands {
    #[command(about = "Send a broadcast to members")]
    Send {
        #[arg(long, help = "Send as region admin instead of district admin")]
        region: bool,
        #[arg(long = "member", required = true, help = "Recipient member id (repeatable)")]
        member_ids: Vec<String>,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },

    #[command(about = "Show mail history")]
    History {
        #[arg(long, help = "Region mail instead of district mail")]
        region: bool,
    },

    #[command(about = "Show the most recent mail")]
    Latest {
        #[arg(long, help = "Region mail instead of district mail")]
        region: bool,
    },

    #[command(about = "List members that received each mail")]
    Recipients {
        #[arg(long, help = "Region mail instead of district mail")]
        region: bool,
    },
}

pub async fn handle(api: &NgoApi, cmd: Commands, format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        Commands::Login {
            email_or_phone,
            role,
            password,
        } => {
            let role: Role = role
                .parse()
                .map_err(|e: String| AppError::invalid_field("role", e))?;
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };
            let session = api
                .login(&Credentials {
                    email_or_phone,
                    password,
                    role,
                })
                .await?;
            let view = json!({
                "role": session.role,
                "unique_id": session.unique_id,
                "landing_route": session.role.landing_route(),
            });
            emit(format, &view, |_| {
                format!(
                    "Logged in as {} ({}). Landing page: {}",
                    session.unique_id,
                    session.role,
                    session.role.landing_route()
                )
            })
        }

        Commands::Logout => {
            api.logout().await;
            emit(format, &json!({"logged_out": true}), |_| "Logged out".to_string())
        }

        Commands::Whoami => {
            let Some(session) = api.session().current_session() else {
                return emit(format, &Value::Null, |_| "Not logged in".to_string());
            };
            let view = json!({
                "role": session.role,
                "unique_id": session.unique_id,
                "name": session.display_name(),
                "districts": session.districts(),
                "access_expires_at": session.access_expires_at(),
            });
            emit(format, &view, |_| {
                let mut lines = vec![
                    format!("User:      {}", session.unique_id),
                    format!("Role:      {}", session.role),
                ];
                if let Some(name) = session.display_name() {
                    lines.push(format!("Name:      {}", name));
                }
                let districts = session.districts();
                if !districts.is_empty() {
                    lines.push(format!("Districts: {}", districts.join(", ")));
                }
                if let Some(exp) = session.access_expires_at() {
                    lines.push(format!("Token exp: {}", exp.to_rfc3339()));
                }
                lines.join("\n")
            })
        }

        Commands::Refresh => match api.session().refresh_access_token().await {
            Some(_) => emit(format, &json!({"refreshed": true}), |_| {
                "Access token refreshed".to_string()
            }),
            None => Err(AppError::SessionExpired.into()),
        },

        Commands::Members { district } => {
            let records = match district {
                Some(d) => api.members(Some(&d)).await?,
                None => api.members_in_scope().await?,
            };
            emit(format, &records, |r| record_lines(r))
        }

        Commands::Dashboard => {
            let summary = api.dashboard_summary().await?;
            emit(format, &summary, |s| {
                let mut lines = Vec::new();
                match &s.members {
                    Section::Loaded(m) => lines.push(format!(
                        "Members:           {} total, {} pending, {} accepted, {} rejected",
                        m.total, m.pending, m.accepted, m.rejected
                    )),
                    Section::Failed(e) => lines.push(format!("Members:           {}", e)),
                }
                for (label, section) in [
                    ("Society donations", &s.society_donations),
                    ("General donations", &s.general_donations),
                ] {
                    match section {
                        Section::Loaded(d) => lines.push(format!(
                            "{}: {} total, {} pending, {} success, {} failed",
                            label, d.total, d.pending, d.success, d.failed
                        )),
                        Section::Failed(e) => lines.push(format!("{}: {}", label, e)),
                    }
                }
                lines.join("\n")
            })
        }

        Commands::Problems { cmd } => handle_problems(api, cmd, format).await,
        Commands::Mail { cmd } => handle_mail(api, cmd, format).await,

        Commands::Feedback => {
            let feedback = api.public_feedback().await?;
            emit(format, &feedback, |items| {
                items
                    .iter()
                    .map(|f| {
                        format!(
                            "{} ({}★) {}\n  {}",
                            f.full_name,
                            f.rating,
                            f.created_at.as_deref().unwrap_or(""),
                            f.message
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
    }
}

async fn handle_problems(
    api: &NgoApi,
    cmd: ProblemCommands,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        ProblemCommands::List => {
            let reports = api.problem_reports().await?;
            emit(format, &reports, |r| record_lines(r))
        }
        ProblemCommands::Status { id, status, remark } => {
            let updated = api
                .update_problem_status(&id, &ProblemStatusUpdate { status, remark })
                .await?;
            emit(format, &updated, |_| format!("Report {} updated", id))
        }
        ProblemCommands::Delete { id } => {
            api.delete_problem_report(&id).await?;
            emit(format, &json!({"deleted": id}), |_| {
                format!("Report {} deleted", id)
            })
        }
    }
}

async fn handle_mail(api: &NgoApi, cmd: MailCommands, format: OutputFormat) -> anyhow::Result<()> {
    let sender = |region: bool| {
        if region {
            MailSender::Region
        } else {
            MailSender::District
        }
    };

    match cmd {
        MailCommands::Send {
            region,
            member_ids,
            subject,
            message,
        } => {
            let draft = MailDraft {
                member_ids,
                subject,
                message,
            };
            let sent = api.send_mail(sender(region), &draft, None).await?;
            emit(format, &sent, |_| {
                format!("Mail sent to {} member(s)", draft.member_ids.len())
            })
        }
        MailCommands::History { region } => {
            let history = mail_history(api, sender(region)).await?;
            emit(format, &history, |h| record_lines(h))
        }
        MailCommands::Latest { region } => {
            let latest = match sender(region) {
                MailSender::District => api.latest_district_mail().await?,
                MailSender::Region => api.latest_region_mail().await?,
            };
            emit(format, &latest, |m| match m {
                Some(m) => format!(
                    "From:       {}\nRecipients: {} members\nSubject:    {}\n\n{}",
                    m.sender,
                    m.member_ids.len(),
                    m.subject,
                    m.message
                ),
                None => "(no mail sent yet)".to_string(),
            })
        }
        MailCommands::Recipients { region } => {
            let (history, members) = tokio::join!(
                mail_history(api, sender(region)),
                api.members_in_scope()
            );
            let pairs = mail_recipients(&history?, &members?);
            emit(format, &pairs, |pairs| {
                pairs
                    .iter()
                    .map(|p| {
                        format!(
                            "{:<30} {}",
                            p.mail["subject"].as_str().unwrap_or("N/A"),
                            record_lines(std::slice::from_ref(&p.member))
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
    }
}

async fn mail_history(api: &NgoApi, sender: MailSender) -> crate::error::Result<Vec<Value>> {
    match sender {
        MailSender::District => api.district_mail_history().await,
        MailSender::Region => api.region_mail_history().await,
    }
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
