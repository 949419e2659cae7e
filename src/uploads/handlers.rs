use std::path::Path as FsPath;

use axum::{
    extract::{Multipart, Path, State},
    response::Redirect,
    Json,
};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::uploads::repo::Upload;

const PRESIGN_TTL_SECONDS: u64 = 600;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Object key: fresh uuid plus the client file's extension, so the CDN can
/// infer a sensible type even without metadata.
fn object_key(file_name: &str) -> String {
    let ext = FsPath::new(file_name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    format!("{}{}", Uuid::new_v4().simple(), ext)
}

/// POST /upload (multipart, field `file`). Stores the bytes in object storage
/// and records a row so downloads can 404 on unknown ids.
#[instrument(skip(state, mp))]
pub async fn upload_file(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(e.to_string()))?;

        let key = object_key(&file_name);
        state
            .storage
            .put_object(&key, data, &content_type)
            .await
            .map_err(ApiError::Upstream)?;

        let upload = Upload::insert(&state.db, &key, &content_type).await?;
        info!(upload_id = %upload.id, key = %key, "file uploaded");
        return Ok(Json(UploadResponse {
            url: format!("/api/uploads/{}", upload.id),
        }));
    }

    Err(ApiError::Validation("file field is required".into()))
}

/// GET /uploads/{id}: temporary redirect to a presigned object URL.
#[instrument(skip(state))]
pub async fn get_upload(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, ApiError> {
    let upload = Upload::get(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("file"))?;

    let url = state
        .storage
        .presign_get(&upload.s3_key, PRESIGN_TTL_SECONDS)
        .await
        .map_err(ApiError::Upstream)?;

    Ok(Redirect::temporary(&url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_keeps_extension() {
        let key = object_key("photo.PNG");
        assert!(key.ends_with(".PNG"));
        assert_eq!(key.len(), 32 + 4);
    }

    #[test]
    fn object_key_without_extension() {
        let key = object_key("raw");
        assert_eq!(key.len(), 32);
    }

    #[test]
    fn object_keys_are_unique() {
        assert_ne!(object_key("a.png"), object_key("a.png"));
    }
}
