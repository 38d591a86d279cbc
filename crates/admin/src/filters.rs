//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::DateTime;

/// Render a platform timestamp string as a readable local-agnostic form.
///
/// Falls back to the raw input when it is not RFC 3339 - the platform owns
/// the format and the table should still render whatever arrives.
///
/// Usage in templates: `{{ merchant.created_at|datetime }}`
#[askama::filter_fn]
pub fn datetime(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_timestamp(&value.to_string()))
}

/// RFC 3339 in, `YYYY-MM-DD HH:MM` out; anything else passes through.
fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_owned(),
        |parsed| parsed.format("%Y-%m-%d %H:%M").to_string(),
    )
}
