//! Field rules shared by the Parent and Child factories.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{DomainError, DomainResult};

pub const MAX_NAME_LEN: usize = 100;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

/// Trim and check a personal name field.
pub fn normalize_name(field: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

pub fn normalize_email(value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if !EMAIL_RE.is_match(trimmed) {
        return Err(DomainError::validation(format!(
            "invalid email address: {:?}",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}

/// Parse a birth date given either as an RFC-3339 timestamp or a plain
/// `YYYY-MM-DD` date (midnight UTC).
pub fn parse_birth_date(raw: &str) -> DomainResult<DateTime<Utc>> {
    let raw = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
        })
        .map_err(|_| {
            DomainError::validation(format!(
                "invalid birth date {:?}: expected RFC-3339 or YYYY-MM-DD",
                raw
            ))
        })?;
    check_birth_date(parsed)?;
    Ok(parsed)
}

pub fn check_birth_date(birth_date: DateTime<Utc>) -> DomainResult<()> {
    if birth_date > Utc::now() {
        return Err(DomainError::validation("birth date cannot be in the future"));
    }
    if birth_date.year() < 1900 {
        return Err(DomainError::validation("birth date cannot be before 1900"));
    }
    Ok(())
}

/// Age in whole years on the given day.
pub fn age_on(birth_date: DateTime<Utc>, today: NaiveDate) -> i32 {
    let born = birth_date.date_naive();
    let mut age = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    age
}
