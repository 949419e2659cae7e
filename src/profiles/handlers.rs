use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::profiles::dto::{ListParams, ProfileCreate, ProfileFilter, ProfileUpdate};
use crate::profiles::repo_types::Profile;
use crate::profiles::vcard;
use crate::state::AppState;

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ProfileCreate>,
) -> Result<(StatusCode, Json<Profile>), ApiError> {
    let profile = Profile::create(&state.db, user.id, payload).await?;
    info!(profile_id = %profile.id, user_id = %user.id, unique_link = %profile.unique_link, "profile created");
    Ok((StatusCode::CREATED, Json(profile)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_profiles(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Profile>>, ApiError> {
    let filter = ProfileFilter::parse(params.filter.as_deref());
    let profiles = Profile::list_by_owner(&state.db, user.id, filter).await?;
    Ok(Json(profiles))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError> {
    let profile = Profile::get_by_id(&state.db, id, user.id)
        .await?
        .ok_or(ApiError::NotFound("profile"))?;
    Ok(Json(profile))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<Profile>, ApiError> {
    if payload.is_empty() {
        return Err(ApiError::NoOpUpdate);
    }
    let profile = Profile::update(&state.db, id, user.id, &payload)
        .await?
        .ok_or(ApiError::NotFound("profile"))?;
    info!(profile_id = %profile.id, user_id = %user.id, "profile updated");
    Ok(Json(profile))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn toggle_archive(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let is_archived = Profile::toggle_archive(&state.db, id, user.id)
        .await?
        .ok_or(ApiError::NotFound("profile"))?;
    info!(profile_id = %id, user_id = %user.id, is_archived, "profile archive toggled");
    Ok(Json(json!({ "is_archived": is_archived })))
}

/// Public card page lookup; no identity resolution at all.
#[instrument(skip(state))]
pub async fn public_profile(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let profile = Profile::get_by_slug(&state.db, &slug)
        .await?
        .ok_or(ApiError::NotFound("profile"))?;
    Ok(Json(profile))
}

/// Public vCard download for a profile.
#[instrument(skip(state))]
pub async fn download_vcard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = Profile::get_by_id_any(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("profile"))?;

    let body = vcard::render(&profile);

    let filename = profile.name.replace(['"', '\r', '\n'], "");
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/vcard; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}.vcf\"", filename))
            .map_err(|e| ApiError::Internal(e.into()))?,
    );
    Ok((headers, body))
}
