//! Read-only API for the marketing site (`/public`). No authentication;
//! only published rows are visible.

use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::Json;
use medtour_core::cpt::ContentType;
use medtour_core::status::STATUS_PUBLISHED;
use medtour_db::listing::{ListParams, ListQuery};
use medtour_db::repositories::{
    BlogPostRepo, DestinationRepo, DoctorRepo, HospitalRepo, SpecialtyRepo, StaticPageRepo,
    TestimonialRepo, TreatmentRepo, VideoRepo,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Resolve a public URL key to a publishable content type.
fn public_type(key: &str) -> AppResult<ContentType> {
    ContentType::from_key(key)
        .filter(|ct| ct.is_publishable())
        .ok_or_else(|| AppError::NotFound(format!("Unknown content type '{key}'")))
}

/// Type-specific filters from the raw query string.
fn filter<T: DeserializeOwned>(uri: &Uri) -> AppResult<T> {
    Query::<T>::try_from_uri(uri)
        .map(|Query(f)| f)
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

fn to_value<T: Serialize>(value: T) -> AppResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::InternalError(format!("Serialization error: {e}")))
}

/// GET /api/public/{cpt}
///
/// Published rows only; listing parameters and the type's filters apply.
pub async fn list(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<ListQuery>,
    uri: Uri,
) -> AppResult<Json<DataResponse<Value>>> {
    let ct = public_type(&key)?;
    let params = ListParams::resolve_published(ct, &query)?;
    let pool = &state.pool;

    let data = match ct {
        ContentType::Specialty => to_value(SpecialtyRepo::list(pool, &params).await?)?,
        ContentType::Treatment => {
            to_value(TreatmentRepo::list(pool, &params, &filter(&uri)?).await?)?
        }
        ContentType::Destination => {
            to_value(DestinationRepo::list(pool, &params, &filter(&uri)?).await?)?
        }
        ContentType::Hospital => {
            to_value(HospitalRepo::list(pool, &params, &filter(&uri)?).await?)?
        }
        ContentType::Doctor => to_value(DoctorRepo::list(pool, &params, &filter(&uri)?).await?)?,
        ContentType::BlogPost => {
            to_value(BlogPostRepo::list(pool, &params, &filter(&uri)?).await?)?
        }
        ContentType::Testimonial => {
            to_value(TestimonialRepo::list(pool, &params, &filter(&uri)?).await?)?
        }
        ContentType::Video => to_value(VideoRepo::list(pool, &params, &filter(&uri)?).await?)?,
        ContentType::StaticPage => to_value(StaticPageRepo::list(pool, &params).await?)?,
        ContentType::Submission | ContentType::Media | ContentType::User => {
            return Err(AppError::NotFound(format!("Unknown content type '{key}'")));
        }
    };
    Ok(Json(DataResponse { data }))
}

/// GET /api/public/{cpt}/{slug}
///
/// A published row by slug. Drafts, archived rows and types without slugs
/// are reported as not found.
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path((key, slug)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<Value>>> {
    let ct = public_type(&key)?;
    let pool = &state.pool;

    macro_rules! published {
        ($repo:ident) => {
            $repo::find_by_slug(pool, &slug)
                .await?
                .filter(|row| row.status == STATUS_PUBLISHED)
                .map(to_value)
                .transpose()?
        };
    }

    let data = match ct {
        ContentType::Specialty => published!(SpecialtyRepo),
        ContentType::Treatment => published!(TreatmentRepo),
        ContentType::Destination => published!(DestinationRepo),
        ContentType::Hospital => published!(HospitalRepo),
        ContentType::Doctor => published!(DoctorRepo),
        ContentType::BlogPost => published!(BlogPostRepo),
        ContentType::Video => published!(VideoRepo),
        ContentType::StaticPage => published!(StaticPageRepo),
        _ => None,
    };

    let data = data.ok_or_else(|| {
        AppError::NotFound(format!("No published {} with slug '{slug}'", ct.label().to_lowercase()))
    })?;
    Ok(Json(DataResponse { data }))
}
