//! EventRepository - Repository per la gestione degli eventi

use super::{Create, Delete, Read, Update, ensure_affected};
use crate::dtos::{CreateEventDTO, EventQuery, UpdateEventDTO};
use crate::entities::Event;
use chrono::Utc;
use sqlx::{Error, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, instrument};

const SELECT_EVENT: &str = r#"
    SELECT
        event_id, title, description, location, starts_at, ends_at, department_id, created_by,
        created_at, updated_at
    FROM events
"#;

// EVENT REPOSITORY
pub struct EventRepository {
    connection_pool: SqlitePool,
}

impl EventRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Eventi in ordine cronologico; `from`/`to` filtrano su `starts_at`
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &EventQuery) -> Result<Vec<Event>, Error> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(SELECT_EVENT);
        query_builder.push(" WHERE 1 = 1");
        if let Some(from) = filter.from {
            query_builder.push(" AND starts_at >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            query_builder.push(" AND starts_at <= ").push_bind(to);
        }
        if let Some(department_id) = filter.department_id {
            query_builder.push(" AND department_id = ").push_bind(department_id);
        }
        query_builder.push(" ORDER BY starts_at, event_id");

        let events = query_builder
            .build_query_as::<Event>()
            .fetch_all(&self.connection_pool)
            .await?;

        debug!("Found {} events", events.len());
        Ok(events)
    }
}

impl Create<Event, CreateEventDTO> for EventRepository {
    #[instrument(skip(self, data), fields(title = %data.title))]
    async fn create(&self, data: &CreateEventDTO) -> Result<Event, Error> {
        debug!("Creating new event");
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO events (
                title, description, location, starts_at, ends_at, department_id, created_by,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.title.trim())
        .bind(data.description.as_deref())
        .bind(data.location.as_deref())
        .bind(data.starts_at)
        .bind(data.ends_at)
        .bind(data.department_id)
        .bind(data.created_by)
        .bind(now)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid();
        info!("Event created with id {}", new_id);
        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Event, i64> for EventRepository {
    async fn read(&self, id: &i64) -> Result<Option<Event>, Error> {
        sqlx::query_as::<_, Event>(&format!("{} WHERE event_id = ?", SELECT_EVENT))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Event, UpdateEventDTO, i64> for EventRepository {
    #[instrument(skip(self, data))]
    async fn update(&self, id: &i64, data: &UpdateEventDTO) -> Result<Event, Error> {
        let mut query_builder = QueryBuilder::<Sqlite>::new("UPDATE events SET ");
        let mut separated = query_builder.separated(", ");

        if let Some(ref title) = data.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title.trim().to_string());
        }
        if let Some(ref description) = data.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description.clone());
        }
        if let Some(ref location) = data.location {
            separated.push("location = ");
            separated.push_bind_unseparated(location.clone());
        }
        if let Some(starts_at) = data.starts_at {
            separated.push("starts_at = ");
            separated.push_bind_unseparated(starts_at);
        }
        if let Some(ends_at) = data.ends_at {
            separated.push("ends_at = ");
            separated.push_bind_unseparated(ends_at);
        }
        if let Some(department_id) = data.department_id {
            separated.push("department_id = ");
            separated.push_bind_unseparated(department_id);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());

        query_builder.push(" WHERE event_id = ");
        query_builder.push_bind(*id);

        let result = query_builder.build().execute(&self.connection_pool).await?;
        ensure_affected(result)?;

        info!("Event {} updated", id);
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i64> for EventRepository {
    #[instrument(skip(self))]
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM events WHERE event_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        ensure_affected(result)?;

        info!("Event {} deleted", id);
        Ok(())
    }
}
