//! Album art upload and rendition generation

use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use backlot_core::models::{AlbumArtResponse, MediaRef};
use backlot_core::AppError;
use backlot_processing::album_art::{self, AlbumArt, RenditionSize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::upload;

/// Upload album art for a media entry
///
/// Accepts one image file, decodes it, and writes the small and medium JPEG
/// renditions under the configured album art directory. Re-uploading
/// overwrites the previous renditions.
#[utoipa::path(
    post,
    path = "/admin/media/{id}/album-art",
    tag = "admin-media",
    params(
        ("id" = Uuid, Path, description = "Media UUID (album art requires a saved entry)")
    ),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Renditions written", body = AlbumArtResponse),
        (status = 400, description = "Missing or undecodable image", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse),
        (status = 413, description = "Image exceeds the size limit", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(operation = "media_album_art", media = %media_ref))]
pub async fn save_album_art(
    State(state): State<Arc<AppState>>,
    Path(media_ref): Path<MediaRef>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let media_id = media_ref.id().ok_or_else(|| {
        AppError::BadRequest("Save the media entry before uploading album art".to_string())
    })?;

    if state.media.get(media_id).await?.is_none() {
        return Err(AppError::NotFound("Media not found".to_string()).into());
    }

    let (data, filename) = upload::extract_multipart_file(multipart).await?;
    upload::validate_file_size(data.len(), state.config.max_image_size_bytes())?;

    // Decoding and resizing are CPU-bound; keep them off the async runtime.
    let art = tokio::task::spawn_blocking(move || album_art::render(&data))
        .await
        .map_err(|e| AppError::Internal(format!("Album art rendering task failed: {}", e)))?
        .map_err(|e| AppError::ImageProcessing(format!("Failed to process image: {}", e)))?;

    let (small, medium) = write_renditions(&state.config.album_art_dir, media_id, &art).await?;

    tracing::info!(media_id = %media_id, filename = %filename, "Album art renditions written");
    Ok(Json(AlbumArtResponse {
        media_id,
        small,
        medium,
    }))
}

/// Write both renditions, creating the output directory on demand.
/// Returns the written file names.
async fn write_renditions(
    dir: &std::path::Path,
    media_id: Uuid,
    art: &AlbumArt,
) -> Result<(String, String), AppError> {
    tokio::fs::create_dir_all(dir).await?;

    let small_name = RenditionSize::Small.file_name(media_id);
    tokio::fs::write(dir.join(&small_name), art.bytes(RenditionSize::Small)).await?;

    let medium_name = RenditionSize::Medium.file_name(media_id);
    tokio::fs::write(dir.join(&medium_name), art.bytes(RenditionSize::Medium)).await?;

    Ok((small_name, medium_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_renditions_creates_directory_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/art");
        let media_id = Uuid::new_v4();
        let art = AlbumArt {
            small: vec![1, 2, 3],
            medium: vec![4, 5, 6, 7],
        };

        let (small, medium) = write_renditions(&out, media_id, &art).await.unwrap();

        assert_eq!(small, format!("{}s.jpg", media_id));
        assert_eq!(medium, format!("{}m.jpg", media_id));
        assert_eq!(std::fs::read(out.join(&small)).unwrap(), vec![1, 2, 3]);
        assert_eq!(std::fs::read(out.join(&medium)).unwrap(), vec![4, 5, 6, 7]);
    }
}
