use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A file backing a media entry, either the uploaded original or an
/// encoded derivative
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MediaFile {
    pub id: Uuid,
    pub media_id: Uuid,
    /// Lowercase file extension, e.g. "mp4".
    pub file_type: String,
    pub url: String,
    pub size_bytes: i64,
    pub is_original: bool,
    pub created_at: DateTime<Utc>,
}

/// Media file representation returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MediaFileResponse {
    pub id: Uuid,
    pub file_type: String,
    pub url: String,
    pub size_bytes: i64,
    pub is_original: bool,
    pub created_at: DateTime<Utc>,
}

impl From<MediaFile> for MediaFileResponse {
    fn from(file: MediaFile) -> Self {
        MediaFileResponse {
            id: file.id,
            file_type: file.file_type,
            url: file.url,
            size_bytes: file.size_bytes,
            is_original: file.is_original,
            created_at: file.created_at,
        }
    }
}

/// Fields for registering a new file against a media entry
#[derive(Debug, Clone)]
pub struct NewMediaFile {
    pub file_type: String,
    pub url: String,
    pub size_bytes: i64,
    pub is_original: bool,
}
