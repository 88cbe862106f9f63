//! URL slug generation and validation.
//!
//! Every publishable entity except testimonials is addressed on the public
//! site by a slug unique within its table.

use crate::error::CoreError;

/// Maximum slug length accepted by the database columns.
pub const MAX_SLUG_LEN: usize = 200;

/// Generate a URL-safe slug from a name or title.
///
/// Accented Latin letters are folded to ASCII, everything else that is not an
/// ASCII letter or digit becomes a hyphen, runs of hyphens are collapsed, and
/// leading/trailing hyphens are trimmed.
///
/// # Examples
///
/// ```
/// use medtour_core::slug::generate_slug;
/// assert_eq!(generate_slug("Hip Replacement"), "hip-replacement");
/// assert_eq!(generate_slug("  Istanbul, Türkiye  "), "istanbul-turkiye");
/// ```
pub fn generate_slug(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_hyphen = true;

    for c in text.chars() {
        let folded = fold_char(c);
        for fc in folded.chars() {
            let lower = fc.to_ascii_lowercase();
            if lower.is_ascii_alphanumeric() {
                result.push(lower);
                prev_hyphen = false;
            } else if !prev_hyphen {
                result.push('-');
                prev_hyphen = true;
            }
        }
    }

    let trimmed = result.trim_end_matches('-');
    let mut slug = trimmed.to_string();
    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        slug = slug.trim_end_matches('-').to_string();
    }
    slug
}

/// Validate an explicit slug (non-empty, lowercase alphanumerics and single hyphens).
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".into()));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "Slug must be at most {MAX_SLUG_LEN} characters"
        )));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "Slug must contain only lowercase letters, digits and hyphens".into(),
        ));
    }
    if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
        return Err(CoreError::Validation(
            "Slug must not start or end with a hyphen or contain consecutive hyphens".into(),
        ));
    }
    Ok(())
}

/// Pick the slug for a create: the explicit one when present, otherwise one
/// generated from `fallback` (the entity's name or title).
pub fn resolve_slug(explicit: Option<&str>, fallback: &str) -> Result<String, CoreError> {
    match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => {
            validate_slug(slug)?;
            Ok(slug.to_string())
        }
        None => {
            let generated = generate_slug(fallback);
            if generated.is_empty() {
                return Err(CoreError::Validation(
                    "Could not derive a slug; provide one explicitly".into(),
                ));
            }
            Ok(generated)
        }
    }
}

/// Fold common accented Latin characters to their ASCII base letters.
fn fold_char(c: char) -> String {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' => "a",
        'æ' | 'Æ' => "ae",
        'ç' | 'Ç' | 'č' | 'Č' | 'ć' | 'Ć' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ę' | 'Ě' => "e",
        'ğ' | 'Ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ı' | 'ī' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'İ' | 'Ī' => "i",
        'ñ' | 'Ñ' | 'ń' | 'Ń' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' => "o",
        'œ' | 'Œ' => "oe",
        'ş' | 'Ş' | 'š' | 'Š' | 'ś' | 'Ś' => "s",
        'ß' => "ss",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' | 'Ů' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        'ž' | 'Ž' | 'ź' | 'Ź' | 'ż' | 'Ż' => "z",
        other => return other.to_string(),
    };
    folded.to_string()
}
