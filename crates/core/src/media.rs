//! Media library upload rules.
//!
//! Uploads are accepted by extension (the declared content type is only used
//! as a cross-check), stored under a random name, and addressed publicly at
//! `/uploads/<stored name>`.

use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// Public URL prefix for stored uploads.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Maximum length kept from the client-supplied filename.
pub const MAX_ORIGINAL_NAME_LEN: usize = 255;

/// Allowed extensions and their canonical MIME types.
const ALLOWED: &[(&str, &str, bool)] = &[
    ("jpg", "image/jpeg", true),
    ("jpeg", "image/jpeg", true),
    ("png", "image/png", true),
    ("gif", "image/gif", true),
    ("webp", "image/webp", true),
    ("svg", "image/svg+xml", true),
    ("pdf", "application/pdf", false),
];

/// Classification of an accepted upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadKind {
    /// Lower-case extension without the dot.
    pub extension: String,
    pub mime_type: &'static str,
    pub is_image: bool,
}

impl UploadKind {
    /// Raster images whose dimensions can be read from the file header.
    pub fn is_raster(&self) -> bool {
        self.is_image && self.extension != "svg"
    }
}

/// Accept or reject an upload by filename and declared content type.
///
/// A declared type of `application/octet-stream` (or none) is accepted;
/// any other declared type must agree with the extension's family.
pub fn classify_upload(filename: &str, declared_mime: Option<&str>) -> Result<UploadKind, CoreError> {
    let ext = extension_of(filename).ok_or_else(|| {
        CoreError::Validation(format!("File '{filename}' has no extension"))
    })?;
    let (_, mime, is_image) = ALLOWED
        .iter()
        .find(|(e, _, _)| *e == ext)
        .copied()
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "File type '.{ext}' is not allowed. Allowed: {}",
                allowed_extensions().join(", ")
            ))
        })?;

    if let Some(declared) = declared_mime
        .map(|m| m.trim().to_ascii_lowercase())
        .filter(|m| !m.is_empty() && m != "application/octet-stream")
    {
        let family_ok = if is_image {
            declared.starts_with("image/")
        } else {
            declared == mime
        };
        if !family_ok {
            return Err(CoreError::Validation(format!(
                "Content type '{declared}' does not match file extension '.{ext}'"
            )));
        }
    }

    Ok(UploadKind {
        extension: ext,
        mime_type: mime,
        is_image,
    })
}

/// Allowed file extensions, in display order.
pub fn allowed_extensions() -> Vec<&'static str> {
    ALLOWED.iter().map(|(e, _, _)| *e).collect()
}

/// Random storage name `<uuid v4>.<ext>`.
pub fn stored_filename(extension: &str) -> String {
    format!("{}.{extension}", uuid::Uuid::new_v4())
}

/// Public URL of a stored file.
pub fn public_url(stored_name: &str) -> String {
    format!("{UPLOADS_URL_PREFIX}/{stored_name}")
}

/// Strip directory components and control characters from a client filename.
pub fn sanitize_original_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return "upload".to_string();
    }
    trimmed.chars().take(MAX_ORIGINAL_NAME_LEN).collect()
}

/// Reject empty files and files above `max_bytes`.
pub fn check_size(len: usize, max_bytes: usize) -> Result<(), CoreError> {
    if len == 0 {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if len > max_bytes {
        return Err(CoreError::Validation(format!(
            "File is too large ({len} bytes). Maximum is {max_bytes} bytes"
        )));
    }
    Ok(())
}

/// Hex SHA-256 of the file contents, logged with each upload.
pub fn checksum(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

fn extension_of(filename: &str) -> Option<String> {
    let base = filename.rsplit(['/', '\\']).next()?;
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_images_case_insensitively() {
        let kind = classify_upload("Photo.JPG", Some("image/jpeg")).unwrap();
        assert_eq!(kind.extension, "jpg");
        assert_eq!(kind.mime_type, "image/jpeg");
        assert!(kind.is_raster());
    }

    #[test]
    fn svg_is_image_but_not_raster() {
        let kind = classify_upload("logo.svg", None).unwrap();
        assert!(kind.is_image);
        assert!(!kind.is_raster());
    }

    #[test]
    fn pdf_requires_matching_declared_type() {
        assert!(classify_upload("brochure.pdf", Some("application/pdf")).is_ok());
        assert!(classify_upload("brochure.pdf", Some("application/octet-stream")).is_ok());
        assert!(classify_upload("brochure.pdf", Some("image/png")).is_err());
    }

    #[test]
    fn rejects_disallowed_and_missing_extensions() {
        assert_matches!(classify_upload("run.exe", None), Err(CoreError::Validation(_)));
        assert!(classify_upload("README", None).is_err());
        assert!(classify_upload(".png", None).is_err());
    }

    #[test]
    fn stored_names_are_unique() {
        let a = stored_filename("png");
        let b = stored_filename("png");
        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
        assert_eq!(public_url(&a), format!("/uploads/{a}"));
    }

    #[test]
    fn sanitize_strips_paths() {
        assert_eq!(sanitize_original_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_original_name("C:\\Users\\me\\scan.pdf"), "scan.pdf");
        assert_eq!(sanitize_original_name("  "), "upload");
        assert_eq!(sanitize_original_name(".."), "upload");
    }

    #[test]
    fn size_limits() {
        assert!(check_size(0, 10).is_err());
        assert!(check_size(10, 10).is_ok());
        assert!(check_size(11, 10).is_err());
    }

    #[test]
    fn checksum_of_empty_input() {
        assert_eq!(
            checksum(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
