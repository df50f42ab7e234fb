//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use backlot_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Backlot Admin API",
        version = "0.1.0",
        description = "Administrative API for the media publishing workflow: paginated listing and search, edit form state, create/update/trash, album art renditions, and review/encoding/publish status transitions. All admin endpoints require a bearer API key."
    ),
    paths(
        // Media administration
        handlers::media_index::list_media,
        handlers::media_edit::edit_media,
        handlers::media_save::save_media,
        handlers::media_album_art::save_album_art,
        handlers::media_status::update_status,
    ),
    components(
        schemas(
            // Core models
            models::MediaResponse,
            models::MediaListItem,
            models::MediaListResponse,
            models::MediaFormValues,
            models::EditMediaResponse,
            models::MediaFileResponse,
            models::TagResponse,
            models::Author,
            models::StatusFlag,
            // Request models
            models::SaveMediaRequest,
            models::UpdateStatusRequest,
            // Response models
            models::UpdateStatusResponse,
            models::AlbumArtResponse,
            // Error
            error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "admin-media", description = "Media administration: listing, editing, album art, and workflow status")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
