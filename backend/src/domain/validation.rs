//! Text field rules applied before any write.

use super::errors::{LedgerError, LedgerResult};

pub const MAX_CATEGORY_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 255;
pub const MAX_EMAIL_LEN: usize = 255;

fn bounded_text(field: &'static str, raw: &str, max_len: usize) -> LedgerResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation(field, "must not be empty"));
    }
    if trimmed.chars().count() > max_len {
        return Err(LedgerError::validation(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn category_name(raw: &str) -> LedgerResult<String> {
    bounded_text("name", raw, MAX_CATEGORY_NAME_LEN)
}

pub fn description(raw: &str) -> LedgerResult<String> {
    bounded_text("description", raw, MAX_DESCRIPTION_LEN)
}

/// Emails are compared case-insensitively, so they are stored lowercased.
pub fn email(raw: &str) -> LedgerResult<String> {
    let email = bounded_text("email", raw, MAX_EMAIL_LEN)?.to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(LedgerError::validation("email", "must be a valid email address")),
    }
}
