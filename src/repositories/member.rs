//! MemberRepository - Repository per la gestione dei membri

use super::{Create, Delete, Read, Update, ensure_affected};
use crate::dtos::{CreateMemberDTO, MemberQuery, UpdateMemberDTO, query::like_pattern};
use crate::entities::{FamilyRelationship, Member, MemberStatus};
use chrono::{DateTime, Utc};
use sqlx::{Error, QueryBuilder, Sqlite, SqliteConnection, SqliteExecutor, SqlitePool};
use tracing::{debug, info, instrument};

const SELECT_MEMBER: &str = r#"
    SELECT
        member_id, family_id, first_name, last_name, gender, birth_date, phone, email,
        relationship, status, baptized, baptism_date, profile_picture, registered_on, notes,
        created_at, updated_at
    FROM members
"#;

// MEMBER REPOSITORY
pub struct MemberRepository {
    connection_pool: SqlitePool,
}

/// Legge un membro con qualsiasi executor (pool o transazione)
pub(crate) async fn find_member<'e, E: SqliteExecutor<'e>>(
    executor: E,
    member_id: i64,
) -> Result<Option<Member>, Error> {
    sqlx::query_as::<_, Member>(&format!("{} WHERE member_id = ?", SELECT_MEMBER))
        .bind(member_id)
        .fetch_optional(executor)
        .await
}

/// Inserisce un membro sulla connessione data, ritorna l'id generato.
/// Usato anche dalla creazione famiglia per inserire i membri nella stessa transazione.
pub(crate) async fn insert_member(
    conn: &mut SqliteConnection,
    family_id: Option<i64>,
    data: &CreateMemberDTO,
    now: DateTime<Utc>,
) -> Result<i64, Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO members (
            family_id, first_name, last_name, gender, birth_date, phone, email, relationship,
            status, baptized, baptism_date, registered_on, notes, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(family_id)
    .bind(data.first_name.trim())
    .bind(data.last_name.trim())
    .bind(data.gender)
    .bind(data.birth_date)
    .bind(data.phone.as_deref())
    .bind(data.email.as_deref())
    .bind(data.relationship)
    .bind(data.status.unwrap_or(MemberStatus::Active))
    .bind(data.baptized.unwrap_or(false))
    .bind(data.baptism_date)
    .bind(data.registered_on)
    .bind(data.notes.as_deref())
    .bind(now)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

impl MemberRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Lista dei membri filtrata, ordinata per cognome e nome
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &MemberQuery) -> Result<Vec<Member>, Error> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(SELECT_MEMBER);
        query_builder.push(" WHERE 1 = 1");

        if let Some(pattern) = like_pattern(filter.search.as_deref()) {
            query_builder
                .push(" AND (first_name LIKE ")
                .push_bind(pattern.clone())
                .push(" OR last_name LIKE ")
                .push_bind(pattern.clone())
                .push(" OR (first_name || ' ' || last_name) LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(status) = filter.status {
            query_builder.push(" AND status = ").push_bind(status);
        }
        if let Some(family_id) = filter.family_id {
            query_builder.push(" AND family_id = ").push_bind(family_id);
        }
        if filter.unassigned == Some(true) {
            query_builder.push(" AND family_id IS NULL");
        }
        query_builder.push(" ORDER BY last_name, first_name, member_id");

        let members = query_builder
            .build_query_as::<Member>()
            .fetch_all(&self.connection_pool)
            .await?;

        debug!("Found {} members", members.len());
        Ok(members)
    }

    /// Tutti i membri di una famiglia: prima il capofamiglia, poi per data di nascita
    #[instrument(skip(self))]
    pub async fn list_by_family(&self, family_id: &i64) -> Result<Vec<Member>, Error> {
        sqlx::query_as::<_, Member>(&format!(
            "{} WHERE family_id = ? ORDER BY CASE relationship WHEN 'HEAD' THEN 0 WHEN 'SPOUSE' THEN 1 ELSE 2 END, birth_date, member_id",
            SELECT_MEMBER
        ))
        .bind(family_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Sposta il membro in un'altra famiglia, o lo stacca con `family_id = None`.
    /// La relazione viene sostituita con quella indicata (None la azzera).
    #[instrument(skip(self))]
    pub async fn assign_family(
        &self,
        member_id: &i64,
        family_id: Option<i64>,
        relationship: Option<FamilyRelationship>,
    ) -> Result<Member, Error> {
        let result = sqlx::query(
            "UPDATE members SET family_id = ?, relationship = ?, updated_at = ? WHERE member_id = ?",
        )
        .bind(family_id)
        .bind(relationship)
        .bind(Utc::now())
        .bind(member_id)
        .execute(&self.connection_pool)
        .await?;
        ensure_affected(result)?;

        info!("Member {} assigned to family {:?}", member_id, family_id);
        self.read(member_id).await?.ok_or(Error::RowNotFound)
    }

    /// Imposta (o rimuove) il nome del file della foto profilo
    #[instrument(skip(self))]
    pub async fn set_profile_picture(
        &self,
        member_id: &i64,
        stored_name: Option<&str>,
    ) -> Result<Member, Error> {
        let result = sqlx::query(
            "UPDATE members SET profile_picture = ?, updated_at = ? WHERE member_id = ?",
        )
        .bind(stored_name)
        .bind(Utc::now())
        .bind(member_id)
        .execute(&self.connection_pool)
        .await?;
        ensure_affected(result)?;

        self.read(member_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Create<Member, CreateMemberDTO> for MemberRepository {
    #[instrument(skip(self, data), fields(family_id = ?data.family_id))]
    async fn create(&self, data: &CreateMemberDTO) -> Result<Member, Error> {
        debug!("Creating new member");
        let mut conn = self.connection_pool.acquire().await?;
        let new_id = insert_member(&mut conn, data.family_id, data, Utc::now()).await?;

        info!("Member created with id {}", new_id);
        find_member(&mut *conn, new_id)
            .await?
            .ok_or(Error::RowNotFound)
    }
}

impl Read<Member, i64> for MemberRepository {
    async fn read(&self, id: &i64) -> Result<Option<Member>, Error> {
        find_member(&self.connection_pool, *id).await
    }
}

impl Update<Member, UpdateMemberDTO, i64> for MemberRepository {
    #[instrument(skip(self, data))]
    async fn update(&self, id: &i64, data: &UpdateMemberDTO) -> Result<Member, Error> {
        // Build dynamic UPDATE query using QueryBuilder (idiomatic SQLx way)
        let mut query_builder = QueryBuilder::<Sqlite>::new("UPDATE members SET ");
        let mut separated = query_builder.separated(", ");

        if let Some(ref first_name) = data.first_name {
            separated.push("first_name = ");
            separated.push_bind_unseparated(first_name.trim().to_string());
        }
        if let Some(ref last_name) = data.last_name {
            separated.push("last_name = ");
            separated.push_bind_unseparated(last_name.trim().to_string());
        }
        if let Some(gender) = data.gender {
            separated.push("gender = ");
            separated.push_bind_unseparated(gender);
        }
        if let Some(birth_date) = data.birth_date {
            separated.push("birth_date = ");
            separated.push_bind_unseparated(birth_date);
        }
        if let Some(ref phone) = data.phone {
            separated.push("phone = ");
            separated.push_bind_unseparated(phone.clone());
        }
        if let Some(ref email) = data.email {
            separated.push("email = ");
            separated.push_bind_unseparated(email.clone());
        }
        if let Some(relationship) = data.relationship {
            separated.push("relationship = ");
            separated.push_bind_unseparated(relationship);
        }
        if let Some(status) = data.status {
            separated.push("status = ");
            separated.push_bind_unseparated(status);
        }
        if let Some(baptized) = data.baptized {
            separated.push("baptized = ");
            separated.push_bind_unseparated(baptized);
        }
        if let Some(baptism_date) = data.baptism_date {
            separated.push("baptism_date = ");
            separated.push_bind_unseparated(baptism_date);
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

        query_builder.push(" WHERE member_id = ");
        query_builder.push_bind(*id);

        let result = query_builder.build().execute(&self.connection_pool).await?;
        ensure_affected(result)?;

        info!("Member {} updated", id);
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i64> for MemberRepository {
    #[instrument(skip(self))]
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        // le appartenenze ai team spariscono per ON DELETE CASCADE,
        // le offerte restano con member_id = NULL
        let result = sqlx::query("DELETE FROM members WHERE member_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        ensure_affected(result)?;

        info!("Member {} deleted", id);
        Ok(())
    }
}
