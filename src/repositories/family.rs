//! FamilyRepository - Repository per la gestione delle famiglie

use super::member::insert_member;
use super::{Create, Delete, Read, Update, ensure_affected};
use crate::dtos::{CreateFamilyDTO, FamilyQuery, UpdateFamilyDTO, query::like_pattern};
use crate::entities::{Family, FamilyStatus};
use chrono::Utc;
use sqlx::{Error, QueryBuilder, Sqlite, SqliteExecutor, SqlitePool};
use tracing::{debug, info, instrument};

const SELECT_FAMILY: &str = r#"
    SELECT
        family_id, family_name, address, phone, email, status, registered_on, notes,
        created_at, updated_at
    FROM families
"#;

// FAMILY REPOSITORY
pub struct FamilyRepository {
    connection_pool: SqlitePool,
}

async fn find_family<'e, E: SqliteExecutor<'e>>(
    executor: E,
    family_id: i64,
) -> Result<Option<Family>, Error> {
    sqlx::query_as::<_, Family>(&format!("{} WHERE family_id = ?", SELECT_FAMILY))
        .bind(family_id)
        .fetch_optional(executor)
        .await
}

impl FamilyRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Lista delle famiglie filtrata per nome e stato, ordinata per nome
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &FamilyQuery) -> Result<Vec<Family>, Error> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(SELECT_FAMILY);
        query_builder.push(" WHERE 1 = 1");

        if let Some(pattern) = like_pattern(filter.search.as_deref()) {
            query_builder.push(" AND family_name LIKE ").push_bind(pattern);
        }
        if let Some(status) = filter.status {
            query_builder.push(" AND status = ").push_bind(status);
        }
        query_builder.push(" ORDER BY family_name, family_id");

        let families = query_builder
            .build_query_as::<Family>()
            .fetch_all(&self.connection_pool)
            .await?;

        debug!("Found {} families", families.len());
        Ok(families)
    }

    pub async fn exists(&self, family_id: &i64) -> Result<bool, Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM families WHERE family_id = ?")
            .bind(family_id)
            .fetch_one(&self.connection_pool)
            .await?;
        Ok(count > 0)
    }
}

impl Create<Family, CreateFamilyDTO> for FamilyRepository {
    /// Crea la famiglia e gli eventuali membri nella stessa transazione:
    /// se un membro fallisce non resta una famiglia a metà
    #[instrument(skip(self, data), fields(family_name = %data.family_name, members = data.members.len()))]
    async fn create(&self, data: &CreateFamilyDTO) -> Result<Family, Error> {
        debug!("Creating new family");
        let now = Utc::now();
        let mut tx = self.connection_pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO families (
                family_name, address, phone, email, status, registered_on, notes, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.family_name.trim())
        .bind(data.address.as_deref())
        .bind(data.phone.as_deref())
        .bind(data.email.as_deref())
        .bind(data.status.unwrap_or(FamilyStatus::Active))
        .bind(data.registered_on)
        .bind(data.notes.as_deref())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let family_id = result.last_insert_rowid();

        for member in &data.members {
            let member_id = insert_member(&mut tx, Some(family_id), member, now).await?;
            debug!("Member {} added to new family {}", member_id, family_id);
        }

        let family = find_family(&mut *tx, family_id)
            .await?
            .ok_or(Error::RowNotFound)?;
        tx.commit().await?;

        info!("Family created with id {} and {} members", family_id, data.members.len());
        Ok(family)
    }
}

impl Read<Family, i64> for FamilyRepository {
    async fn read(&self, id: &i64) -> Result<Option<Family>, Error> {
        find_family(&self.connection_pool, *id).await
    }
}

impl Update<Family, UpdateFamilyDTO, i64> for FamilyRepository {
    #[instrument(skip(self, data))]
    async fn update(&self, id: &i64, data: &UpdateFamilyDTO) -> Result<Family, Error> {
        let mut query_builder = QueryBuilder::<Sqlite>::new("UPDATE families SET ");
        let mut separated = query_builder.separated(", ");

        if let Some(ref family_name) = data.family_name {
            separated.push("family_name = ");
            separated.push_bind_unseparated(family_name.trim().to_string());
        }
        if let Some(ref address) = data.address {
            separated.push("address = ");
            separated.push_bind_unseparated(address.clone());
        }
        if let Some(ref phone) = data.phone {
            separated.push("phone = ");
            separated.push_bind_unseparated(phone.clone());
        }
        if let Some(ref email) = data.email {
            separated.push("email = ");
            separated.push_bind_unseparated(email.clone());
        }
        if let Some(status) = data.status {
            separated.push("status = ");
            separated.push_bind_unseparated(status);
        }
        if let Some(registered_on) = data.registered_on {
            separated.push("registered_on = ");
            separated.push_bind_unseparated(registered_on);
        }
        if let Some(ref notes) = data.notes {
            separated.push("notes = ");
            separated.push_bind_unseparated(notes.clone());
        }
        separated.push("updated_at = ");
        separated.push_bind_unseparated(Utc::now());

        query_builder.push(" WHERE family_id = ");
        query_builder.push_bind(*id);

        let result = query_builder.build().execute(&self.connection_pool).await?;
        ensure_affected(result)?;

        info!("Family {} updated", id);
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i64> for FamilyRepository {
    #[instrument(skip(self))]
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        // i membri restano, con family_id = NULL (ON DELETE SET NULL)
        let result = sqlx::query("DELETE FROM families WHERE family_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        ensure_affected(result)?;

        info!("Family {} deleted", id);
        Ok(())
    }
}
