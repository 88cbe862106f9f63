//! Field-level validation shared by every create/update path.
//!
//! Each helper returns [`CoreError::Validation`] with a message naming the
//! offending field so the admin console can show it next to the input.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Default maximum length for short text columns (names, titles).
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length for SEO meta descriptions.
pub const MAX_META_DESCRIPTION_LEN: usize = 320;

/// Require a non-blank value no longer than `max_len` characters.
pub fn require_text(field: &str, value: &str, max_len: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    check_len(field, value, max_len)
}

/// Like [`require_text`] but for optional fields; `None` always passes.
///
/// An explicitly blank value is rejected so updates cannot blank out a
/// required column by sending `""`.
pub fn require_text_if_present(
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> Result<(), CoreError> {
    match value {
        Some(v) => require_text(field, v, max_len),
        None => Ok(()),
    }
}

/// Length-check an optional free-text value.
pub fn optional_text(field: &str, value: Option<&str>, max_len: usize) -> Result<(), CoreError> {
    match value {
        Some(v) => check_len(field, v, max_len),
        None => Ok(()),
    }
}

fn check_len(field: &str, value: &str, max_len: usize) -> Result<(), CoreError> {
    if value.chars().count() > max_len {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !email.trim().validate_email() {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Testimonial ratings are whole stars from 1 to 5.
pub fn validate_rating(rating: i16) -> Result<(), CoreError> {
    if !(1..=5).contains(&rating) {
        return Err(CoreError::Validation(
            "rating must be between 1 and 5".into(),
        ));
    }
    Ok(())
}

/// Hospital scores are a 0-5 scale with decimals.
pub fn validate_score(field: &str, score: f64) -> Result<(), CoreError> {
    if !(0.0..=5.0).contains(&score) {
        return Err(CoreError::Validation(format!(
            "{field} must be between 0 and 5"
        )));
    }
    Ok(())
}

/// Prices are non-negative and `from` may not exceed `to`.
pub fn validate_price_range(from: Option<f64>, to: Option<f64>) -> Result<(), CoreError> {
    for (field, value) in [("price_from", from), ("price_to", to)] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(CoreError::Validation(format!(
                    "{field} must be a non-negative number"
                )));
            }
        }
    }
    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            return Err(CoreError::Validation(
                "price_from must not exceed price_to".into(),
            ));
        }
    }
    Ok(())
}

/// ISO 4217 style currency code: exactly three upper-case ASCII letters.
pub fn validate_currency(code: &str) -> Result<(), CoreError> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(CoreError::Validation(format!(
            "currency '{code}' must be a three-letter code such as USD"
        )));
    }
    Ok(())
}

/// Accept absolute http(s) URLs and site-relative paths (e.g. `/uploads/x.png`).
pub fn validate_url(field: &str, url: &str) -> Result<(), CoreError> {
    let trimmed = url.trim();
    let ok = trimmed.starts_with("https://")
        || trimmed.starts_with("http://")
        || (trimmed.starts_with('/') && !trimmed.starts_with("//"));
    if !ok || trimmed.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(format!(
            "{field} must be an http(s) URL or a site-relative path"
        )));
    }
    Ok(())
}

/// Validate an optional URL field.
pub fn optional_url(field: &str, url: Option<&str>) -> Result<(), CoreError> {
    match url.filter(|u| !u.trim().is_empty()) {
        Some(u) => validate_url(field, u),
        None => Ok(()),
    }
}

/// Require a non-negative integer (experience years, bed counts, ...).
pub fn non_negative(field: &str, value: Option<i32>) -> Result<(), CoreError> {
    if let Some(v) = value {
        if v < 0 {
            return Err(CoreError::Validation(format!(
                "{field} must not be negative"
            )));
        }
    }
    Ok(())
}

/// Sort and de-duplicate a list of related ids, rejecting non-positive values.
pub fn normalize_ids(field: &str, ids: &[i64]) -> Result<Vec<i64>, CoreError> {
    if let Some(bad) = ids.iter().find(|id| **id <= 0) {
        return Err(CoreError::Validation(format!(
            "{field} contains an invalid id: {bad}"
        )));
    }
    let mut out = ids.to_vec();
    out.sort_unstable();
    out.dedup();
    Ok(out)
}
