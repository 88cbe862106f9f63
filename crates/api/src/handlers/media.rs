//! Handlers for the media library (`/media`).
//!
//! Files are written to the configured upload directory under a random name
//! and served back from `/uploads/<name>`.

use std::io::Cursor;
use std::path::Path as FsPath;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use image::ImageFormat;
use medtour_core::cpt::ContentType;
use medtour_core::error::CoreError;
use medtour_core::media::{
    check_size, checksum, classify_upload, public_url, sanitize_original_name, stored_filename,
    UploadKind,
};
use medtour_core::types::DbId;
use medtour_core::validation::optional_text;
use medtour_db::listing::{ListParams, ListQuery, Page};
use medtour_db::models::media::{CreateMedia, Media, MediaFilter, UpdateMedia};
use medtour_db::repositories::MediaRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::activity::{record, Activity};
use crate::handlers::content;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAuth, RequireEditor};
use crate::response::DataResponse;
use crate::state::AppState;

const CT: ContentType = ContentType::Media;

const MAX_ALT_TEXT_LEN: usize = 500;

/// Response of the rich-text editor upload endpoint.
#[derive(Debug, Serialize)]
pub struct EditorUpload {
    pub id: DbId,
    pub url: String,
}

/// A file pulled out of a multipart body.
pub(crate) struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Read the multipart body, returning the `file` part and the `alt_text`
/// text field when present. Unknown fields are ignored.
pub(crate) async fn read_upload(
    mut multipart: Multipart,
) -> AppResult<(Option<UploadedFile>, Option<String>)> {
    let mut file = None;
    let mut alt_text = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some(UploadedFile {
                    filename,
                    content_type,
                    data: data.to_vec(),
                });
            }
            "alt_text" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                alt_text = Some(text.trim().to_string()).filter(|t| !t.is_empty());
            }
            _ => {}
        }
    }
    Ok((file, alt_text))
}

/// Width and height from the image header, when the format is readable.
fn image_dimensions(data: &[u8]) -> Option<(i32, i32)> {
    let reader = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?;
    let (w, h) = reader.into_dimensions().ok()?;
    Some((i32::try_from(w).ok()?, i32::try_from(h).ok()?))
}

/// Image format a raster extension promises.
fn expected_format(extension: &str) -> Option<ImageFormat> {
    match extension {
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        "png" => Some(ImageFormat::Png),
        "gif" => Some(ImageFormat::Gif),
        "webp" => Some(ImageFormat::WebP),
        _ => None,
    }
}

/// Check that a raster upload's bytes are the format its extension names,
/// and read its dimensions.
fn inspect_raster(kind: &UploadKind, data: &[u8]) -> Result<(i32, i32), CoreError> {
    let mismatch = || {
        CoreError::Validation(format!(
            "File contents are not a valid .{} image",
            kind.extension
        ))
    };
    let detected = image::guess_format(data).map_err(|_| mismatch())?;
    if expected_format(&kind.extension) != Some(detected) {
        return Err(mismatch());
    }
    image_dimensions(data).ok_or_else(mismatch)
}

/// Validate, store and record one upload.
async fn store_upload(
    state: &AppState,
    user: &AuthUser,
    file: UploadedFile,
    alt_text: Option<String>,
    images_only: bool,
) -> AppResult<Media> {
    check_size(file.data.len(), state.config.max_upload_bytes)?;
    let kind: UploadKind = classify_upload(&file.filename, file.content_type.as_deref())?;
    if images_only && !kind.is_image {
        return Err(AppError::Core(CoreError::Validation(
            "Only image files can be inserted into content".into(),
        )));
    }
    optional_text("alt_text", alt_text.as_deref(), MAX_ALT_TEXT_LEN)?;

    let (width, height) = if kind.is_raster() {
        let (w, h) = inspect_raster(&kind, &file.data)?;
        (Some(w), Some(h))
    } else {
        (None, None)
    };

    let upload_dir = &state.config.upload_dir;
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Cannot create upload directory: {e}")))?;

    let filename = stored_filename(&kind.extension);
    let path = upload_dir.join(&filename);
    tokio::fs::write(&path, &file.data)
        .await
        .map_err(|e| AppError::InternalError(format!("Cannot write upload: {e}")))?;

    let input = CreateMedia {
        url: public_url(&filename),
        filename,
        original_name: sanitize_original_name(&file.filename),
        mime_type: kind.mime_type.to_string(),
        size_bytes: file.data.len() as i64,
        width,
        height,
        alt_text,
        uploaded_by: Some(user.user_id),
    };
    let media = match MediaRepo::create(&state.pool, &input).await {
        Ok(media) => media,
        Err(e) => {
            remove_stored_file(&path).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        id = media.id,
        filename = %media.filename,
        size = media.size_bytes,
        sha256 = %checksum(&file.data),
        user_id = user.user_id,
        "Media uploaded"
    );
    let summary = format!("Uploaded '{}'", media.original_name);
    record(state, Activity::on(user, "upload", CT, media.id, summary)).await;
    Ok(media)
}

/// Remove a stored file; a file that is already gone is only logged.
async fn remove_stored_file(path: &FsPath) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "Could not remove stored file");
    }
}

/// POST /api/media
///
/// Multipart form with a required `file` part and optional `alt_text`.
pub async fn upload(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Media>>)> {
    let (file, alt_text) = read_upload(multipart).await?;
    let file = file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    let media = store_upload(&state, &user, file, alt_text, false).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: media })))
}

/// POST /api/media/editor-upload
///
/// Inline images for the rich-text editor. Returns the public URL.
pub async fn editor_upload(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<EditorUpload>>)> {
    let (file, alt_text) = read_upload(multipart).await?;
    let file = file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    let media = store_upload(&state, &user, file, alt_text, true).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: EditorUpload {
                id: media.id,
                url: media.url,
            },
        }),
    ))
}

/// GET /api/media
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<MediaFilter>,
) -> AppResult<Json<DataResponse<Page<Media>>>> {
    if let Some(kind) = filter.kind.as_deref() {
        if kind != "image" && kind != "document" {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Invalid kind '{kind}'. Must be one of: image, document"
            ))));
        }
    }
    let params = ListParams::resolve(CT, &query)?;
    let page = MediaRepo::list(&state.pool, &params, &filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/media/{id}
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Media>>> {
    let media = MediaRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;
    Ok(Json(DataResponse { data: media }))
}

/// PUT /api/media/{id}
pub async fn update(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMedia>,
) -> AppResult<Json<DataResponse<Media>>> {
    optional_text("alt_text", input.alt_text.as_deref(), MAX_ALT_TEXT_LEN)?;
    let media = MediaRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| content::not_found(CT, id))?;

    tracing::info!(id, user_id = user.user_id, "Media updated");
    let summary = format!("Updated '{}'", media.original_name);
    record(&state, Activity::on(&user, "update", CT, id, summary)).await;
    Ok(Json(DataResponse { data: media }))
}

/// DELETE /api/media/{id}
///
/// Removes the row, then the stored file.
pub async fn delete(
    RequireEditor(user): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let media = MediaRepo::delete(&state.pool, id)
        .await
        .map_err(AppError::from_delete)?
        .ok_or_else(|| content::not_found(CT, id))?;

    remove_stored_file(&state.config.upload_dir.join(&media.filename)).await;

    tracing::info!(id, filename = %media.filename, user_id = user.user_id, "Media deleted");
    let summary = format!("Deleted '{}'", media.original_name);
    record(&state, Activity::on(&user, "delete", CT, id, summary)).await;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_png_dimensions() {
        let img = image::RgbImage::new(3, 2);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        assert_eq!(image_dimensions(buf.get_ref()), Some((3, 2)));
    }

    #[test]
    fn unreadable_image_has_no_dimensions() {
        assert_eq!(image_dimensions(b"not an image"), None);
    }

    #[test]
    fn raster_contents_must_match_extension() {
        let img = image::RgbImage::new(3, 2);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        let png = buf.into_inner();

        let as_png = classify_upload("a.png", None).unwrap();
        assert_eq!(inspect_raster(&as_png, &png).unwrap(), (3, 2));

        let as_jpeg = classify_upload("a.jpg", None).unwrap();
        assert!(inspect_raster(&as_jpeg, &png).is_err());
        assert!(inspect_raster(&as_png, b"<svg onload=alert(1)>").is_err());
    }
}
