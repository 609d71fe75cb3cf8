use validator::{ValidateEmail, ValidateUrl};

use crate::error::{AppError, Result};

pub fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Address with a local part, an `@`, and a dotted domain.
pub fn is_email(value: &str) -> bool {
    let value = value.trim();
    if !value.validate_email() {
        return false;
    }
    value
        .rsplit_once('@')
        .map(|(_, domain)| domain.contains('.') && !domain.ends_with('.'))
        .unwrap_or(false)
}

pub fn require_email(field: &str, value: &str) -> Result<()> {
    require(field, value)?;
    if !is_email(value) {
        return Err(AppError::Validation(format!("{} must be a valid email address", field)));
    }
    Ok(())
}

pub fn optional_email(field: &str, value: Option<&str>) -> Result<()> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => require_email(field, v),
        None => Ok(()),
    }
}

pub fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(r) if !r.is_empty()) && value.validate_url()
}

pub fn require_http_url(field: &str, value: &str) -> Result<()> {
    require(field, value)?;
    if !is_http_url(value) {
        return Err(AppError::Validation(format!("{} must be an http(s) URL", field)));
    }
    Ok(())
}

pub fn optional_http_url(field: &str, value: Option<&str>) -> Result<()> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => require_http_url(field, v),
        None => Ok(()),
    }
}
