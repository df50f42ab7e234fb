use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::form;
use crate::models::media_file::{MediaFile, MediaFileResponse};
use crate::models::status::{MediaStatus, StatusFlag};
use crate::models::tag::{Tag, TagResponse};

/// Media entry moving through the publishing workflow
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Media {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub author_name: String,
    pub author_email: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub duration_seconds: i32,
    pub status: MediaStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Media {
    pub fn author(&self) -> Author {
        Author {
            name: self.author_name.clone(),
            email: self.author_email.clone(),
        }
    }
}

/// The person credited for a media entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// One row of the admin listing, with its comment count
#[derive(Debug, Clone, FromRow)]
pub struct MediaListEntry {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub author_name: String,
    pub status: MediaStatus,
    pub duration_seconds: i32,
    pub comment_count: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A media entry together with its files and tags
#[derive(Debug, Clone)]
pub struct MediaDetail {
    pub media: Media,
    pub files: Vec<MediaFile>,
    pub tags: Vec<Tag>,
}

impl MediaDetail {
    /// The uploaded original, if one has been registered.
    pub fn original_file(&self) -> Option<&MediaFile> {
        self.files.iter().find(|file| file.is_original)
    }

    /// Stringly-typed field values for redisplaying the edit form.
    pub fn form_values(&self) -> MediaFormValues {
        let tags: Vec<&str> = self.tags.iter().map(|tag| tag.name.as_str()).collect();
        MediaFormValues {
            slug: self.media.slug.clone(),
            title: self.media.title.clone(),
            author_name: self.media.author_name.clone(),
            author_email: self.media.author_email.clone(),
            description: self.media.description.clone().unwrap_or_default(),
            notes: self.media.notes.clone().unwrap_or_default(),
            tags: tags.join(", "),
            duration: form::format_duration(self.media.duration_seconds),
        }
    }
}

/// Prefilled values for the media edit form, all as entered strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MediaFormValues {
    pub slug: String,
    pub title: String,
    pub author_name: String,
    pub author_email: String,
    pub description: String,
    pub notes: String,
    pub tags: String,
    pub duration: String,
}

impl MediaFormValues {
    /// Defaults for the `new` form, with the administrative notes
    /// template prefilled.
    pub fn for_new(default_notes: &str) -> Self {
        MediaFormValues {
            slug: String::new(),
            title: String::new(),
            author_name: String::new(),
            author_email: String::new(),
            description: String::new(),
            notes: default_notes.to_string(),
            tags: String::new(),
            duration: "0:00".to_string(),
        }
    }
}

/// Full media representation returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct MediaResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub author: Author,
    pub description: Option<String>,
    pub notes: Option<String>,
    /// Duration formatted for display, e.g. "5:07".
    pub duration: String,
    pub duration_seconds: i32,
    #[schema(value_type = Vec<StatusFlag>)]
    pub status: MediaStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub files: Vec<MediaFileResponse>,
    pub tags: Vec<TagResponse>,
}

impl From<MediaDetail> for MediaResponse {
    fn from(detail: MediaDetail) -> Self {
        let author = detail.media.author();
        MediaResponse {
            id: detail.media.id,
            slug: detail.media.slug,
            title: detail.media.title,
            author,
            description: detail.media.description,
            notes: detail.media.notes,
            duration: form::format_duration(detail.media.duration_seconds),
            duration_seconds: detail.media.duration_seconds,
            status: detail.media.status,
            published_at: detail.media.published_at,
            created_at: detail.media.created_at,
            updated_at: detail.media.updated_at,
            files: detail.files.into_iter().map(Into::into).collect(),
            tags: detail.tags.into_iter().map(Into::into).collect(),
        }
    }
}

/// One entry of the admin listing
#[derive(Debug, Serialize, ToSchema)]
pub struct MediaListItem {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub author_name: String,
    #[schema(value_type = Vec<StatusFlag>)]
    pub status: MediaStatus,
    pub duration: String,
    pub comment_count: i64,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<MediaListEntry> for MediaListItem {
    fn from(entry: MediaListEntry) -> Self {
        MediaListItem {
            id: entry.id,
            slug: entry.slug,
            title: entry.title,
            author_name: entry.author_name,
            status: entry.status,
            duration: form::format_duration(entry.duration_seconds),
            comment_count: entry.comment_count,
            published_at: entry.published_at,
            created_at: entry.created_at,
        }
    }
}

/// Paginated admin listing
#[derive(Debug, Serialize, ToSchema)]
pub struct MediaListResponse {
    pub media: Vec<MediaListItem>,
    pub page: i64,
    pub items_per_page: i64,
    pub total: i64,
    pub search: Option<String>,
}

/// Payload backing the edit form: the entry being edited (absent for
/// `new`) and the values to prefill
#[derive(Debug, Serialize, ToSchema)]
pub struct EditMediaResponse {
    pub media: Option<MediaResponse>,
    pub values: MediaFormValues,
}

/// Request DTO for creating or updating a media entry
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SaveMediaRequest {
    /// When true the entry is trashed instead of updated.
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    #[validate(length(max = 50, message = "Slug must be at most 50 characters"))]
    pub slug: Option<String>,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,
    #[validate(length(
        min = 1,
        max = 50,
        message = "Author name must be between 1 and 50 characters"
    ))]
    pub author_name: String,
    #[validate(
        email(message = "Author email must be a valid email address"),
        length(max = 255, message = "Author email must be at most 255 characters")
    )]
    pub author_email: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "Duration is required"))]
    pub duration: String,
    /// Comma-separated tag names.
    #[serde(default)]
    pub tags: String,
}

/// Request DTO for the status action endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of "review_complete", "encoding_complete", or "publish_now".
    pub action: String,
}

/// Result of a status action; failures are reported in `status_error`
/// rather than as HTTP errors
#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateStatusResponse {
    pub media: MediaResponse,
    pub status_error: Option<String>,
}

/// File names of the freshly written album art renditions
#[derive(Debug, Serialize, ToSchema)]
pub struct AlbumArtResponse {
    pub media_id: Uuid,
    pub small: String,
    pub medium: String,
}

/// Column values for inserting or updating a media entry
#[derive(Debug, Clone)]
pub struct MediaWrite {
    pub slug: String,
    pub title: String,
    pub author_name: String,
    pub author_email: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub duration_seconds: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_media() -> Media {
        Media {
            id: Uuid::new_v4(),
            slug: "winter-concert".to_string(),
            title: "Winter Concert".to_string(),
            author_name: "Pat Doe".to_string(),
            author_email: "pat@example.com".to_string(),
            description: Some("An evening of carols.".to_string()),
            notes: None,
            duration_seconds: 307,
            status: MediaStatus::initial(),
            published_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_form_values_from_detail() {
        let media = sample_media();
        let detail = MediaDetail {
            media,
            files: vec![],
            tags: vec![
                Tag {
                    id: Uuid::new_v4(),
                    name: "music".to_string(),
                    slug: "music".to_string(),
                },
                Tag {
                    id: Uuid::new_v4(),
                    name: "concert".to_string(),
                    slug: "concert".to_string(),
                },
            ],
        };

        let values = detail.form_values();
        assert_eq!(values.title, "Winter Concert");
        assert_eq!(values.tags, "music, concert");
        assert_eq!(values.duration, "5:07");
        assert_eq!(values.notes, "");
    }

    #[test]
    fn test_form_values_for_new_prefills_notes() {
        let values = MediaFormValues::for_new("Reviewer: None");
        assert_eq!(values.notes, "Reviewer: None");
        assert_eq!(values.duration, "0:00");
        assert!(values.title.is_empty());
    }

    #[test]
    fn test_original_file_lookup() {
        let media = sample_media();
        let media_id = media.id;
        let original = MediaFile {
            id: Uuid::new_v4(),
            media_id,
            file_type: "avi".to_string(),
            url: "uploads/winter-concert.avi".to_string(),
            size_bytes: 1024,
            is_original: true,
            created_at: Utc::now(),
        };
        let encoded = MediaFile {
            id: Uuid::new_v4(),
            media_id,
            file_type: "mp4".to_string(),
            url: "winter-concert.mp4".to_string(),
            size_bytes: 512,
            is_original: false,
            created_at: Utc::now(),
        };

        let detail = MediaDetail {
            media,
            files: vec![encoded, original.clone()],
            tags: vec![],
        };
        let found = detail.original_file().unwrap();
        assert_eq!(found.id, original.id);
    }

    #[test]
    fn test_save_request_validation() {
        use validator::Validate;

        let valid = SaveMediaRequest {
            delete: false,
            slug: None,
            title: "A Title".to_string(),
            author_name: "Pat".to_string(),
            author_email: "pat@example.com".to_string(),
            description: None,
            notes: None,
            duration: "5:07".to_string(),
            tags: String::new(),
        };
        assert!(valid.validate().is_ok());

        let invalid = SaveMediaRequest {
            title: String::new(),
            author_email: "not-an-email".to_string(),
            ..valid
        };
        let errors = invalid.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
        assert!(errors.field_errors().contains_key("author_email"));
    }

    #[test]
    fn test_media_response_formats_duration() {
        let detail = MediaDetail {
            media: sample_media(),
            files: vec![],
            tags: vec![],
        };
        let response = MediaResponse::from(detail);
        assert_eq!(response.duration, "5:07");
        assert_eq!(response.duration_seconds, 307);
        assert_eq!(response.author.name, "Pat Doe");
    }
}
