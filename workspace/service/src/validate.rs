use crate::error::{Result, ServiceError};

/// Trims `value` and rejects it when blank or longer than `max_len` characters.
pub(crate) fn required(field: &str, value: &str, max_len: usize) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::Validation(format!("{} is required", field)));
    }
    if value.chars().count() > max_len {
        return Err(ServiceError::Validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(value.to_string())
}

/// Like [`required`] but blank input becomes `None`.
pub(crate) fn optional(field: &str, value: Option<&str>, max_len: usize) -> Result<Option<String>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => required(field, value, max_len).map(Some),
        None => Ok(None),
    }
}

/// Shortest accepted password, in characters.
pub(crate) const MIN_PASSWORD_LEN: usize = 6;

pub(crate) fn password(value: &str) -> Result<()> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServiceError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}
