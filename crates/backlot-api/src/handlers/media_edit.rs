//! Edit form state for one media entry

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use backlot_core::models::{EditMediaResponse, MediaFormValues, MediaRef};
use backlot_core::AppError;
use std::sync::Arc;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Fetch the state backing the media edit form
///
/// `id` may be a UUID or the literal `new`, which returns a blank form with
/// the notes template prefilled and no persisted entry.
#[utoipa::path(
    get,
    path = "/admin/media/{id}/edit",
    tag = "admin-media",
    params(
        ("id" = String, Path, description = "Media UUID, or 'new' for a blank form")
    ),
    responses(
        (status = 200, description = "Edit form state", body = EditMediaResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(operation = "media_edit", media = %media_ref))]
pub async fn edit_media(
    State(state): State<Arc<AppState>>,
    Path(media_ref): Path<MediaRef>,
) -> Result<impl IntoResponse, HttpAppError> {
    match media_ref {
        MediaRef::New => Ok(Json(EditMediaResponse {
            media: None,
            values: MediaFormValues::for_new(&state.config.default_notes),
        })),
        MediaRef::Id(id) => {
            let detail = state
                .media
                .get(id)
                .await?
                .ok_or_else(|| AppError::NotFound("Media not found".to_string()))?;
            let values = detail.form_values();
            Ok(Json(EditMediaResponse {
                media: Some(detail.into()),
                values,
            }))
        }
    }
}
