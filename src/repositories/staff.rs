//! StaffRepository - Repository per la gestione dello staff

use super::{Create, Delete, Read, Update, ensure_affected};
use crate::dtos::{CreateStaffDTO, UpdateStaffDTO};
use crate::entities::{Staff, StaffRole};
use chrono::Utc;
use sqlx::{Error, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, instrument};

const SELECT_STAFF: &str = r#"
    SELECT
        staff_id, name, nickname, pin_hash, role, phone, email, profile_picture, is_active,
        created_at, updated_at
    FROM staff
"#;

// STAFF REPO
// Nota: create e update si aspettano il campo `pin` già hashato dal service
pub struct StaffRepository {
    connection_pool: SqlitePool,
}

impl StaffRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Il nickname è univoco, usato per il login
    #[instrument(skip(self))]
    pub async fn find_by_nickname(&self, nickname: &str) -> Result<Option<Staff>, Error> {
        sqlx::query_as::<_, Staff>(&format!("{} WHERE nickname = ?", SELECT_STAFF))
            .bind(nickname)
            .fetch_optional(&self.connection_pool)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Staff>, Error> {
        let staff = sqlx::query_as::<_, Staff>(&format!("{} ORDER BY name, staff_id", SELECT_STAFF))
            .fetch_all(&self.connection_pool)
            .await?;
        debug!("Found {} staff", staff.len());
        Ok(staff)
    }

    pub async fn count(&self) -> Result<i64, Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM staff")
            .fetch_one(&self.connection_pool)
            .await?;
        Ok(count)
    }

    #[instrument(skip(self))]
    pub async fn set_profile_picture(
        &self,
        staff_id: &i64,
        stored_name: Option<&str>,
    ) -> Result<Staff, Error> {
        let result = sqlx::query(
            "UPDATE staff SET profile_picture = ?, updated_at = ? WHERE staff_id = ?",
        )
        .bind(stored_name)
        .bind(Utc::now())
        .bind(staff_id)
        .execute(&self.connection_pool)
        .await?;
        ensure_affected(result)?;

        self.read(staff_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Create<Staff, CreateStaffDTO> for StaffRepository {
    #[instrument(skip(self, data), fields(nickname = %data.nickname))]
    async fn create(&self, data: &CreateStaffDTO) -> Result<Staff, Error> {
        debug!("Creating new staff");
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO staff (name, nickname, pin_hash, role, phone, email, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(data.name.trim())
        .bind(data.nickname.trim())
        .bind(&data.pin)
        .bind(data.role.unwrap_or(StaffRole::Staff))
        .bind(data.phone.as_deref())
        .bind(data.email.as_deref())
        .bind(now)
        .bind(now)
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid();
        info!("Staff created with id {}", new_id);
        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Staff, i64> for StaffRepository {
    async fn read(&self, id: &i64) -> Result<Option<Staff>, Error> {
        sqlx::query_as::<_, Staff>(&format!("{} WHERE staff_id = ?", SELECT_STAFF))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Staff, UpdateStaffDTO, i64> for StaffRepository {
    #[instrument(skip(self, data))]
    async fn update(&self, id: &i64, data: &UpdateStaffDTO) -> Result<Staff, Error> {
        let mut query_builder = QueryBuilder::<Sqlite>::new("UPDATE staff SET ");
        let mut separated = query_builder.separated(", ");

        if let Some(ref name) = data.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name.trim().to_string());
        }
        if let Some(ref nickname) = data.nickname {
            separated.push("nickname = ");
            separated.push_bind_unseparated(nickname.trim().to_string());
        }
        if let Some(ref pin_hash) = data.pin {
            separated.push("pin_hash = ");
            separated.push_bind_unseparated(pin_hash.clone());
        }
        if let Some(role) = data.role {
            separated.push("role = ");
            separated.push_bind_unseparated(role);
        }
        if let Some(ref phone) = data.phone {
            separated.push("phone = ");
            separated.push_bind_unseparated(phone.clone());
        }
        if let Some(ref email) = data.email {
            separated.push("email = ");
            separated.push_bind_unseparated(email.clone());
        }
        if let Some(is_active) = data.is_active {
            separated.push("is_active = ");
            separated.push_bind_unseparated(is_active);
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());

        query_builder.push(" WHERE staff_id = ");
        query_builder.push_bind(*id);

        let result = query_builder.build().execute(&self.connection_pool).await?;
        ensure_affected(result)?;

        info!("Staff {} updated", id);
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i64> for StaffRepository {
    #[instrument(skip(self))]
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        // offerte, eventi e avvisi restano con il riferimento a NULL
        let result = sqlx::query("DELETE FROM staff WHERE staff_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        ensure_affected(result)?;

        info!("Staff {} deleted", id);
        Ok(())
    }
}
