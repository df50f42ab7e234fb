//! Media repository

use backlot_core::form;
use backlot_core::models::{
    Media, MediaDetail, MediaFile, MediaListEntry, MediaStatus, MediaWrite, NewMediaFile,
    StatusFlag, Tag,
};
use backlot_core::AppError;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const MEDIA_COLUMNS: &str = "id, slug, title, author_name, author_email, description, notes, \
     duration_seconds, status, published_at, created_at, updated_at";

/// Repository for media entries and their files
#[derive(Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch one page of the admin listing plus the total row count.
    ///
    /// Trashed entries are excluded. An optional search term matches
    /// title, description, notes, or tag names, case-insensitively.
    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "select"))]
    pub async fn list(
        &self,
        search: Option<&str>,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<MediaListEntry>, i64), AppError> {
        // Saturate so an absurd page number yields an empty page, not an
        // overflow or a negative OFFSET.
        let offset = page.saturating_sub(1).saturating_mul(per_page);

        let mut conditions = vec!["(m.status & $1) = 0".to_string()];
        let mut param_count = 1;

        let pattern = search.map(|term| format!("%{}%", escape_like(term)));
        if pattern.is_some() {
            param_count += 1;
            conditions.push(format!(
                "(m.title ILIKE ${p} OR m.description ILIKE ${p} OR m.notes ILIKE ${p} \
                 OR EXISTS (SELECT 1 FROM media_tags mt JOIN tags t ON t.id = mt.tag_id \
                 WHERE mt.media_id = m.id AND t.name ILIKE ${p}))",
                p = param_count
            ));
        }

        let where_clause = conditions.join(" AND ");

        let count_sql = format!("SELECT COUNT(*) FROM media m WHERE {}", where_clause);
        let list_sql = format!(
            "SELECT m.id, m.slug, m.title, m.author_name, m.status, m.duration_seconds, \
             (SELECT COUNT(*) FROM comments c WHERE c.media_id = m.id) AS comment_count, \
             m.published_at, m.created_at \
             FROM media m \
             WHERE {} \
             ORDER BY m.status DESC, m.created_at ASC \
             LIMIT ${} OFFSET ${}",
            where_clause,
            param_count + 1,
            param_count + 2
        );

        let mut count_query =
            sqlx::query_scalar::<Postgres, i64>(&count_sql).bind(StatusFlag::Trash.bit());
        let mut list_query =
            sqlx::query_as::<Postgres, MediaListEntry>(&list_sql).bind(StatusFlag::Trash.bit());
        if let Some(ref pattern) = pattern {
            count_query = count_query.bind(pattern.as_str());
            list_query = list_query.bind(pattern.as_str());
        }

        let total = count_query.fetch_one(&self.pool).await?;
        let entries = list_query
            .bind(per_page)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((entries, total))
    }

    /// Fetch a media entry with its files and tags.
    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "select"))]
    pub async fn get(&self, id: Uuid) -> Result<Option<MediaDetail>, AppError> {
        let media = sqlx::query_as::<Postgres, Media>(&format!(
            "SELECT {} FROM media WHERE id = $1",
            MEDIA_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let media = match media {
            Some(media) => media,
            None => return Ok(None),
        };

        let files = sqlx::query_as::<Postgres, MediaFile>(
            "SELECT id, media_id, file_type, url, size_bytes, is_original, created_at \
             FROM media_files WHERE media_id = $1 ORDER BY created_at, id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let tags = sqlx::query_as::<Postgres, Tag>(
            "SELECT t.id, t.name, t.slug FROM tags t \
             JOIN media_tags mt ON mt.tag_id = t.id \
             WHERE mt.media_id = $1 ORDER BY t.name",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(MediaDetail { media, files, tags }))
    }

    /// Insert a new media entry with the initial workflow status.
    #[tracing::instrument(skip(self, tx, write), fields(db.table = "media", db.operation = "insert"))]
    pub async fn insert(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        write: &MediaWrite,
    ) -> Result<Media, AppError> {
        let media = sqlx::query_as::<Postgres, Media>(&format!(
            "INSERT INTO media (id, slug, title, author_name, author_email, description, \
             notes, duration_seconds, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {}",
            MEDIA_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&write.slug)
        .bind(&write.title)
        .bind(&write.author_name)
        .bind(&write.author_email)
        .bind(&write.description)
        .bind(&write.notes)
        .bind(write.duration_seconds)
        .bind(MediaStatus::initial())
        .fetch_one(&mut **tx)
        .await?;

        Ok(media)
    }

    /// Update the editable fields of an existing entry. Status is left
    /// untouched; the status endpoint owns workflow transitions.
    #[tracing::instrument(skip(self, tx, write), fields(db.table = "media", db.operation = "update"))]
    pub async fn update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        write: &MediaWrite,
    ) -> Result<Option<Media>, AppError> {
        let media = sqlx::query_as::<Postgres, Media>(&format!(
            "UPDATE media SET slug = $2, title = $3, author_name = $4, author_email = $5, \
             description = $6, notes = $7, duration_seconds = $8, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {}",
            MEDIA_COLUMNS
        ))
        .bind(id)
        .bind(&write.slug)
        .bind(&write.title)
        .bind(&write.author_name)
        .bind(&write.author_email)
        .bind(&write.description)
        .bind(&write.notes)
        .bind(write.duration_seconds)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(media)
    }

    /// Soft-delete an entry by adding the trash flag. The row and its
    /// files are kept.
    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "update"))]
    pub async fn trash(&self, id: Uuid) -> Result<Option<Media>, AppError> {
        let media = sqlx::query_as::<Postgres, Media>(&format!(
            "UPDATE media SET status = status | $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {}",
            MEDIA_COLUMNS
        ))
        .bind(id)
        .bind(StatusFlag::Trash.bit())
        .fetch_optional(&self.pool)
        .await?;

        Ok(media)
    }

    /// Replace the status set, stamping `published_at` when provided.
    #[tracing::instrument(skip(self, tx), fields(db.table = "media", db.operation = "update"))]
    pub async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: MediaStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Media>, AppError> {
        let media = sqlx::query_as::<Postgres, Media>(&format!(
            "UPDATE media SET status = $2, published_at = COALESCE($3, published_at), \
             updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {}",
            MEDIA_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .bind(published_at)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(media)
    }

    /// Register a file against a media entry.
    #[tracing::instrument(skip(self, tx, file), fields(db.table = "media_files", db.operation = "insert"))]
    pub async fn add_file(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        media_id: Uuid,
        file: &NewMediaFile,
    ) -> Result<MediaFile, AppError> {
        let file = sqlx::query_as::<Postgres, MediaFile>(
            "INSERT INTO media_files (id, media_id, file_type, url, size_bytes, is_original) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, media_id, file_type, url, size_bytes, is_original, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(media_id)
        .bind(&file.file_type)
        .bind(&file.url)
        .bind(file.size_bytes)
        .bind(file.is_original)
        .fetch_one(&mut **tx)
        .await?;

        Ok(file)
    }

    /// Check whether a slug is taken, optionally ignoring one entry
    /// (the entry being updated).
    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "select"))]
    pub async fn slug_exists(
        &self,
        slug: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS (SELECT 1 FROM media WHERE slug = $1 \
             AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Replace the tag set of a media entry, creating missing tags.
    ///
    /// Tags are matched on their slug, so "Easter" reuses an existing
    /// "easter" tag instead of creating a duplicate.
    #[tracing::instrument(skip(self, tx), fields(db.table = "tags", db.operation = "upsert"))]
    pub async fn replace_tags(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        media_id: Uuid,
        names: &[String],
    ) -> Result<Vec<Tag>, AppError> {
        sqlx::query("DELETE FROM media_tags WHERE media_id = $1")
            .bind(media_id)
            .execute(&mut **tx)
            .await?;

        let mut tags: Vec<Tag> = Vec::with_capacity(names.len());
        for name in names {
            let slug = form::slugify(name);
            // DO UPDATE instead of DO NOTHING so RETURNING always
            // yields the row, existing or fresh.
            let tag = sqlx::query_as::<Postgres, Tag>(
                "INSERT INTO tags (id, name, slug) VALUES ($1, $2, $3) \
                 ON CONFLICT (slug) DO UPDATE SET slug = EXCLUDED.slug \
                 RETURNING id, name, slug",
            )
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(&slug)
            .fetch_one(&mut **tx)
            .await?;

            sqlx::query(
                "INSERT INTO media_tags (media_id, tag_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(media_id)
            .bind(tag.id)
            .execute(&mut **tx)
            .await?;

            if !tags.iter().any(|existing| existing.id == tag.id) {
                tags.push(tag);
            }
        }

        Ok(tags)
    }

    /// Slugify the requested text and append "-2", "-3", ... until the
    /// result is free.
    pub async fn available_slug(
        &self,
        desired: &str,
        exclude: Option<Uuid>,
    ) -> Result<String, AppError> {
        let base = form::slugify(desired);
        if !self.slug_exists(&base, exclude).await? {
            return Ok(base);
        }

        for n in 2..100 {
            let candidate = form::slug_candidate(&base, n);
            if !self.slug_exists(&candidate, exclude).await? {
                return Ok(candidate);
            }
        }

        Err(AppError::Internal(format!(
            "No available slug found for: {}",
            desired
        )))
    }
}

/// Escape LIKE wildcards so search terms match literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_passes_plain_text() {
        assert_eq!(escape_like("winter concert"), "winter concert");
    }

    #[test]
    fn test_escape_like_escapes_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    // Nothing listens on port 1, and the pool is lazy, so the call only
    // fails once the query runs. The offset arithmetic happens before
    // that and must not panic on extreme page numbers.
    #[tokio::test]
    async fn test_list_survives_out_of_range_page_numbers() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_secs(1))
            .connect_lazy("postgres://127.0.0.1:1/backlot")
            .expect("lazy pool");
        let repo = MediaRepository::new(pool);

        let result = repo.list(None, i64::MAX, 25).await;
        assert!(result.is_err());
    }
}
