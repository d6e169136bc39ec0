//! AnnouncementRepository - Repository per la gestione degli avvisi

use super::{Create, Delete, Read, Update, ensure_affected};
use crate::dtos::{CreateAnnouncementDTO, UpdateAnnouncementDTO};
use crate::entities::Announcement;
use chrono::{DateTime, Utc};
use sqlx::{Error, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, instrument};

const SELECT_ANNOUNCEMENT: &str = r#"
    SELECT
        announcement_id, title, content, author_id, is_pinned, published_at, expires_at, updated_at
    FROM announcements
"#;

// ANNOUNCEMENT REPOSITORY
pub struct AnnouncementRepository {
    connection_pool: SqlitePool,
}

impl AnnouncementRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Avvisi fissati in alto, poi dal più recente.
    /// Con `visible_at` vengono esclusi quelli scaduti a quell'istante.
    #[instrument(skip(self))]
    pub async fn list(&self, visible_at: Option<DateTime<Utc>>) -> Result<Vec<Announcement>, Error> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(SELECT_ANNOUNCEMENT);
        if let Some(now) = visible_at {
            query_builder
                .push(" WHERE expires_at IS NULL OR expires_at > ")
                .push_bind(now);
        }
        query_builder.push(" ORDER BY is_pinned DESC, published_at DESC, announcement_id DESC");

        let announcements = query_builder
            .build_query_as::<Announcement>()
            .fetch_all(&self.connection_pool)
            .await?;

        debug!("Found {} announcements", announcements.len());
        Ok(announcements)
    }
}

impl Create<Announcement, CreateAnnouncementDTO> for AnnouncementRepository {
    #[instrument(skip(self, data), fields(title = %data.title))]
    async fn create(&self, data: &CreateAnnouncementDTO) -> Result<Announcement, Error> {
        debug!("Posting new announcement");
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO announcements (
                title, content, author_id, is_pinned, published_at, expires_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.title.trim())
        .bind(&data.content)
        .bind(data.author_id)
        .bind(data.is_pinned.unwrap_or(false))
        .bind(data.published_at.unwrap_or(now))
        .bind(data.expires_at)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid();
        info!("Announcement created with id {}", new_id);
        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Announcement, i64> for AnnouncementRepository {
    async fn read(&self, id: &i64) -> Result<Option<Announcement>, Error> {
        sqlx::query_as::<_, Announcement>(&format!(
            "{} WHERE announcement_id = ?",
            SELECT_ANNOUNCEMENT
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Update<Announcement, UpdateAnnouncementDTO, i64> for AnnouncementRepository {
    #[instrument(skip(self, data))]
    async fn update(&self, id: &i64, data: &UpdateAnnouncementDTO) -> Result<Announcement, Error> {
        let mut query_builder = QueryBuilder::<Sqlite>::new("UPDATE announcements SET ");
        let mut separated = query_builder.separated(", ");

        if let Some(ref title) = data.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title.trim().to_string());
        }
        if let Some(ref content) = data.content {
            separated.push("content = ");
            separated.push_bind_unseparated(content.clone());
        }
        if let Some(is_pinned) = data.is_pinned {
            separated.push("is_pinned = ");
            separated.push_bind_unseparated(is_pinned);
        }
        if let Some(published_at) = data.published_at {
            separated.push("published_at = ");
            separated.push_bind_unseparated(published_at);
        }
        if let Some(expires_at) = data.expires_at {
            separated.push("expires_at = ");
            separated.push_bind_unseparated(expires_at);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());

        query_builder.push(" WHERE announcement_id = ");
        query_builder.push_bind(*id);

        let result = query_builder.build().execute(&self.connection_pool).await?;
        ensure_affected(result)?;

        info!("Announcement {} updated", id);
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i64> for AnnouncementRepository {
    #[instrument(skip(self))]
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM announcements WHERE announcement_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        ensure_affected(result)?;

        info!("Announcement {} deleted", id);
        Ok(())
    }
}
