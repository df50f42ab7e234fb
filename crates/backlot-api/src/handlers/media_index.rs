//! Paginated, searchable admin listing

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use backlot_core::models::MediaListResponse;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct MediaListParams {
    /// 1-based page number; values below 1 are clamped to 1.
    pub page: Option<i64>,
    /// Substring matched against title, description, notes, and tag names.
    pub search: Option<String>,
}

/// List media entries for the admin screen
///
/// Trashed entries are excluded. Entries with outstanding workflow flags
/// sort before published ones, oldest first within each group.
#[utoipa::path(
    get,
    path = "/admin/media",
    tag = "admin-media",
    params(MediaListParams),
    responses(
        (status = 200, description = "One page of the admin listing", body = MediaListResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(operation = "media_index"))]
pub async fn list_media(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MediaListParams>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = params.page.unwrap_or(1).max(1);
    let per_page = state.config.items_per_page;
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty());

    let (entries, total) = state.media.list(search, page, per_page).await?;

    Ok(Json(MediaListResponse {
        media: entries.into_iter().map(Into::into).collect(),
        page,
        items_per_page: per_page,
        total,
        search: search.map(str::to_string),
    }))
}
