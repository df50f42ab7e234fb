//! Create, update, or trash a media entry

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use backlot_core::models::{EditMediaResponse, MediaRef, MediaWrite, SaveMediaRequest};
use backlot_core::{form, AppError};
use std::sync::Arc;
use validator::Validate;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::transaction::with_transaction;

/// Save a media entry
///
/// With `id = new` a fresh entry is inserted (status draft, unencoded,
/// unreviewed); with a UUID the existing entry is updated. A request with
/// `delete = true` moves the entry to the trash instead. The media row and
/// its tag links are written in one transaction, and the response carries
/// the refreshed edit form state.
#[utoipa::path(
    post,
    path = "/admin/media/{id}",
    tag = "admin-media",
    params(
        ("id" = String, Path, description = "Media UUID, or 'new' to create")
    ),
    request_body = SaveMediaRequest,
    responses(
        (status = 200, description = "Media updated or trashed", body = EditMediaResponse),
        (status = 201, description = "Media created", body = EditMediaResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(operation = "media_save", media = %media_ref))]
pub async fn save_media(
    State(state): State<Arc<AppState>>,
    Path(media_ref): Path<MediaRef>,
    ValidatedJson(request): ValidatedJson<SaveMediaRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    if request.delete {
        return trash_media(&state, media_ref).await;
    }

    let duration_seconds = form::parse_duration(&request.duration)?;

    // A blank slug falls back to one generated from the title.
    let desired_slug = match request.slug.as_deref().map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => request.title.clone(),
    };
    let slug = state
        .media
        .available_slug(&desired_slug, media_ref.id())
        .await?;

    let tag_names = form::parse_tag_list(&request.tags);

    let write = MediaWrite {
        slug,
        title: request.title.trim().to_string(),
        author_name: request.author_name.trim().to_string(),
        author_email: request.author_email.trim().to_string(),
        description: none_if_blank(request.description),
        notes: none_if_blank(request.notes),
        duration_seconds,
    };

    let repo = state.media.clone();
    let media_id = with_transaction(&state.pool, move |tx| {
        Box::pin(async move {
            let media = match media_ref {
                MediaRef::New => repo.insert(tx, &write).await?,
                MediaRef::Id(id) => repo
                    .update(tx, id, &write)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Media not found".to_string()))?,
            };
            repo.replace_tags(tx, media.id, &tag_names).await?;
            Ok(media.id)
        })
    })
    .await?;

    let status = if media_ref.is_new() {
        tracing::info!(media_id = %media_id, "Media created");
        StatusCode::CREATED
    } else {
        tracing::info!(media_id = %media_id, "Media updated");
        StatusCode::OK
    };

    let response = edit_state(&state, media_id).await?;
    Ok((status, Json(response)))
}

/// Soft-delete: adds the trash flag, which hides the entry from the listing.
async fn trash_media(
    state: &Arc<AppState>,
    media_ref: MediaRef,
) -> Result<(StatusCode, Json<EditMediaResponse>), HttpAppError> {
    let id = media_ref.id().ok_or_else(|| {
        AppError::BadRequest("Cannot delete a media entry that has not been saved".to_string())
    })?;

    state
        .media
        .trash(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;

    tracing::info!(media_id = %id, "Media moved to trash");
    let response = edit_state(state, id).await?;
    Ok((StatusCode::OK, Json(response)))
}

/// Refetch the entry and rebuild the edit form payload returned after a save.
async fn edit_state(
    state: &Arc<AppState>,
    media_id: uuid::Uuid,
) -> Result<EditMediaResponse, HttpAppError> {
    let detail = state
        .media
        .get(media_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;
    let values = detail.form_values();
    Ok(EditMediaResponse {
        media: Some(detail.into()),
        values,
    })
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
