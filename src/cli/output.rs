// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use super::OutputFormat;
use crate::models::fields::{first_str, member_identity, DISTRICT_FIELDS};
use serde::Serialize;
use serde_json::Value;

/// Print a value as pretty JSON, or through `text` for humans.
pub fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => println!("{}", text(value)),
    }
    Ok(())
}

/// One line per record: identity, name and district when present.
pub fn record_lines(records: &[Value]) -> String {
    if records.is_empty() {
        return "(no records)".to_string();
    }
    records
        .iter()
        .map(|r| {
            let id = member_identity(r).unwrap_or_else(|| "-".to_string());
            let name = first_str(r, &["full_name", "name", "subject", "title"]).unwrap_or_default();
            let district = first_str(r, DISTRICT_FIELDS).unwrap_or_default();
            let status = first_str(r, &["status"]).unwrap_or_default();
            format!("{:<20} {:<30} {:<18} {}", id, name, district, status)
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_lines() {
        assert_eq!(record_lines(&[]), "(no records)");
        let out = record_lines(&[json!({"id": 3, "full_name": "Ravi", "district": "Almora"})]);
        assert!(out.starts_with("3 "));
        assert!(out.contains("Ravi"));
        assert!(out.ends_with("Almora"));
    }
}
