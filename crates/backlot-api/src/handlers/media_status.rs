//! Workflow status transitions
//!
//! Actions move a media entry through review, encoding, and publication.
//! Business-rule failures (missing encoded file, unknown action) are carried
//! in the `status_error` field of a 200 response rather than as HTTP errors,
//! so the admin screen can redisplay them next to the form.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use backlot_core::models::{
    MediaDetail, MediaRef, NewMediaFile, StatusFlag, UpdateStatusRequest, UpdateStatusResponse,
};
use backlot_core::AppError;
use chrono::Utc;
use std::sync::Arc;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::transaction::with_transaction;

const ACTION_REVIEW_COMPLETE: &str = "review_complete";
const ACTION_ENCODING_COMPLETE: &str = "encoding_complete";
const ACTION_PUBLISH_NOW: &str = "publish_now";

/// Apply a workflow action to a media entry
#[utoipa::path(
    post,
    path = "/admin/media/{id}/status",
    tag = "admin-media",
    params(
        ("id" = Uuid, Path, description = "Media UUID (status actions require a saved entry)")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Action applied; business failures surface in status_error", body = UpdateStatusResponse),
        (status = 400, description = "Invalid media reference", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(operation = "media_status", media = %media_ref))]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(media_ref): Path<MediaRef>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let media_id = media_ref.id().ok_or_else(|| {
        AppError::BadRequest("Save the media entry before updating its status".to_string())
    })?;

    let detail = state
        .media
        .get(media_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;

    let status_error = match request.action.as_str() {
        ACTION_REVIEW_COMPLETE => review_complete(&state, &detail).await?,
        ACTION_ENCODING_COMPLETE => encoding_complete(&state, &detail).await?,
        ACTION_PUBLISH_NOW => publish_now(&state, &detail).await?,
        other => {
            tracing::debug!(action = other, "Unrecognized status action");
            Some("No action to perform".to_string())
        }
    };

    let detail = state
        .media
        .get(media_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;

    Ok(Json(UpdateStatusResponse {
        media: detail.into(),
        status_error,
    }))
}

async fn review_complete(
    state: &Arc<AppState>,
    detail: &MediaDetail,
) -> Result<Option<String>, AppError> {
    let media_id = detail.media.id;
    let next = detail.media.status.without(StatusFlag::Unreviewed);
    let repo = state.media.clone();
    with_transaction(&state.pool, move |tx| {
        Box::pin(async move {
            repo.set_status(tx, media_id, next, None).await?;
            Ok(())
        })
    })
    .await?;
    tracing::info!(media_id = %media_id, status = %next, "Review complete");
    Ok(None)
}

/// Register the encoded file, if it has appeared in the media directory.
///
/// The existence check races against concurrent uploads of the same file;
/// the worst case is a stale size, corrected by the next run of the action.
async fn encoding_complete(
    state: &Arc<AppState>,
    detail: &MediaDetail,
) -> Result<Option<String>, AppError> {
    let original = match detail.original_file() {
        Some(original) => original,
        None => return Ok(Some("Media has no original file".to_string())),
    };

    let encoded_type = state.config.encoded_type.as_str();
    let media_id = detail.media.id;
    let next = detail.media.status.without(StatusFlag::Unencoded);

    // The upload may already be in the target container.
    if original.file_type == encoded_type {
        let repo = state.media.clone();
        with_transaction(&state.pool, move |tx| {
            Box::pin(async move {
                repo.set_status(tx, media_id, next, None).await?;
                Ok(())
            })
        })
        .await?;
        tracing::info!(media_id = %media_id, "Original already encoded");
        return Ok(None);
    }

    let encoded_name = encoded_file_name(&original.url, encoded_type);
    let candidate = state.config.media_dir.join(&encoded_name);
    let metadata = match tokio::fs::metadata(&candidate).await {
        Ok(metadata) => metadata,
        Err(_) => {
            return Ok(Some(format!(
                "Encoded media not found, please upload and name it: {}",
                encoded_name
            )));
        }
    };

    let new_file = NewMediaFile {
        file_type: encoded_type.to_string(),
        url: encoded_name.clone(),
        size_bytes: metadata.len() as i64,
        is_original: false,
    };

    // Register the file and clear the flag together.
    let repo = state.media.clone();
    with_transaction(&state.pool, move |tx| {
        Box::pin(async move {
            repo.add_file(tx, media_id, &new_file).await?;
            repo.set_status(tx, media_id, next, None).await?;
            Ok(())
        })
    })
    .await?;

    tracing::info!(media_id = %media_id, file = %encoded_name, "Encoded file registered");
    Ok(None)
}

async fn publish_now(
    state: &Arc<AppState>,
    detail: &MediaDetail,
) -> Result<Option<String>, AppError> {
    let media_id = detail.media.id;
    let next = detail
        .media
        .status
        .without(StatusFlag::Draft)
        .with(StatusFlag::Publish);
    let repo = state.media.clone();
    with_transaction(&state.pool, move |tx| {
        Box::pin(async move {
            repo.set_status(tx, media_id, next, Some(Utc::now())).await?;
            Ok(())
        })
    })
    .await?;
    tracing::info!(media_id = %media_id, status = %next, "Media published");
    Ok(None)
}

/// Expected name of the encoded counterpart: the original's url with its
/// extension swapped for the configured container. A dot inside a leading
/// directory component does not count as an extension, and neither do the
/// leading dots of a hidden file name.
fn encoded_file_name(original_url: &str, encoded_type: &str) -> String {
    let base_start = original_url.rfind('/').map_or(0, |i| i + 1);
    let basename = &original_url[base_start..];
    let leading_dots = basename.len() - basename.trim_start_matches('.').len();
    let name_start = base_start + leading_dots;
    let stem_end = match original_url.rfind('.') {
        Some(i) if i > name_start => i,
        _ => original_url.len(),
    };
    format!("{}.{}", &original_url[..stem_end], encoded_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_name_swaps_extension() {
        assert_eq!(encoded_file_name("winter-concert.avi", "mp4"), "winter-concert.mp4");
    }

    #[test]
    fn encoded_name_keeps_directory_prefix() {
        assert_eq!(
            encoded_file_name("uploads/winter-concert.avi", "mp4"),
            "uploads/winter-concert.mp4"
        );
    }

    #[test]
    fn encoded_name_only_strips_the_last_extension() {
        assert_eq!(
            encoded_file_name("uploads/winter.concert.avi", "mp4"),
            "uploads/winter.concert.mp4"
        );
    }

    #[test]
    fn encoded_name_without_extension_appends_one() {
        assert_eq!(encoded_file_name("winter-concert", "mp4"), "winter-concert.mp4");
    }

    #[test]
    fn encoded_name_ignores_dots_in_directories() {
        assert_eq!(encoded_file_name("v1.2/winter", "mp4"), "v1.2/winter.mp4");
    }

    #[test]
    fn encoded_name_treats_leading_dot_as_hidden_file() {
        assert_eq!(encoded_file_name(".hidden", "mp4"), ".hidden.mp4");
        assert_eq!(encoded_file_name("uploads/.hidden", "mp4"), "uploads/.hidden.mp4");
    }

    #[test]
    fn encoded_name_skips_consecutive_leading_dots() {
        assert_eq!(encoded_file_name("..hidden", "mp4"), "..hidden.mp4");
        assert_eq!(encoded_file_name("uploads/..hidden", "mp4"), "uploads/..hidden.mp4");
        assert_eq!(encoded_file_name("..hidden.avi", "mp4"), "..hidden.mp4");
    }
}
