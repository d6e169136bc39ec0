//! TeamRepository - Repository per la gestione dei team e delle appartenenze membro-team

use super::{Create, Delete, Read, Update, ensure_affected};
use crate::dtos::{CreateTeamDTO, MemberTeamDTO, TeamMemberDTO, TeamQuery, UpdateTeamDTO};
use crate::entities::{Team, TeamMembership, TeamRole};
use chrono::Utc;
use sqlx::{Error, QueryBuilder, Sqlite, SqliteExecutor, SqlitePool};
use tracing::{debug, info, instrument};

const SELECT_TEAM: &str = r#"
    SELECT team_id, department_id, name, description, leader_member_id, created_at
    FROM teams
"#;

// TEAM REPOSITORY
pub struct TeamRepository {
    connection_pool: SqlitePool,
}

async fn find_membership<'e, E: SqliteExecutor<'e>>(
    executor: E,
    team_id: i64,
    member_id: i64,
) -> Result<Option<TeamMembership>, Error> {
    sqlx::query_as::<_, TeamMembership>(
        "SELECT team_id, member_id, role, joined_at FROM team_members WHERE team_id = ? AND member_id = ?",
    )
    .bind(team_id)
    .bind(member_id)
    .fetch_optional(executor)
    .await
}

impl TeamRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, filter: &TeamQuery) -> Result<Vec<Team>, Error> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(SELECT_TEAM);
        if let Some(department_id) = filter.department_id {
            query_builder.push(" WHERE department_id = ").push_bind(department_id);
        }
        query_builder.push(" ORDER BY name, team_id");

        let teams = query_builder
            .build_query_as::<Team>()
            .fetch_all(&self.connection_pool)
            .await?;

        debug!("Found {} teams", teams.len());
        Ok(teams)
    }

    /// Membri del team con il loro ruolo: prima i leader, poi per cognome
    #[instrument(skip(self))]
    pub async fn list_members(&self, team_id: &i64) -> Result<Vec<TeamMemberDTO>, Error> {
        sqlx::query_as::<_, TeamMemberDTO>(
            r#"
            SELECT tm.team_id, m.member_id, m.first_name, m.last_name, tm.role, tm.joined_at,
                   m.profile_picture
            FROM team_members tm
            INNER JOIN members m ON m.member_id = tm.member_id
            WHERE tm.team_id = ?
            ORDER BY CASE tm.role WHEN 'LEADER' THEN 0 ELSE 1 END, m.last_name, m.first_name
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Team di cui fa parte un membro, con il nome del reparto
    #[instrument(skip(self))]
    pub async fn teams_of_member(&self, member_id: &i64) -> Result<Vec<MemberTeamDTO>, Error> {
        sqlx::query_as::<_, MemberTeamDTO>(
            r#"
            SELECT t.team_id, t.name AS team_name, d.department_id, d.name AS department_name,
                   tm.role, tm.joined_at
            FROM team_members tm
            INNER JOIN teams t ON t.team_id = tm.team_id
            INNER JOIN departments d ON d.department_id = t.department_id
            WHERE tm.member_id = ?
            ORDER BY d.name, t.name
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.connection_pool)
        .await
    }

    pub async fn membership(
        &self,
        team_id: &i64,
        member_id: &i64,
    ) -> Result<Option<TeamMembership>, Error> {
        find_membership(&self.connection_pool, *team_id, *member_id).await
    }

    #[instrument(skip(self))]
    pub async fn add_member(
        &self,
        team_id: &i64,
        member_id: &i64,
        role: TeamRole,
    ) -> Result<TeamMembership, Error> {
        sqlx::query("INSERT INTO team_members (team_id, member_id, role, joined_at) VALUES (?, ?, ?, ?)")
            .bind(team_id)
            .bind(member_id)
            .bind(role)
            .bind(Utc::now())
            .execute(&self.connection_pool)
            .await?;

        info!("Member {} added to team {} as {:?}", member_id, team_id, role);
        self.membership(team_id, member_id)
            .await?
            .ok_or(Error::RowNotFound)
    }

    #[instrument(skip(self))]
    pub async fn update_member_role(
        &self,
        team_id: &i64,
        member_id: &i64,
        role: TeamRole,
    ) -> Result<TeamMembership, Error> {
        let result =
            sqlx::query("UPDATE team_members SET role = ? WHERE team_id = ? AND member_id = ?")
                .bind(role)
                .bind(team_id)
                .bind(member_id)
                .execute(&self.connection_pool)
                .await?;
        ensure_affected(result)?;

        self.membership(team_id, member_id)
            .await?
            .ok_or(Error::RowNotFound)
    }

    #[instrument(skip(self))]
    pub async fn remove_member(&self, team_id: &i64, member_id: &i64) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = ? AND member_id = ?")
            .bind(team_id)
            .bind(member_id)
            .execute(&self.connection_pool)
            .await?;
        ensure_affected(result)?;

        info!("Member {} removed from team {}", member_id, team_id);
        Ok(())
    }

    /// Sposta un membro da un team all'altro mantenendo il ruolo.
    /// Rimozione e inserimento avvengono nella stessa transazione.
    ///
    /// # Returns
    /// * `Err(RowNotFound)` - il membro non fa parte del team di origine
    /// * `Err(Database)` con unique violation - il membro è già nel team di destinazione
    #[instrument(skip(self))]
    pub async fn move_member(
        &self,
        source_team_id: &i64,
        target_team_id: &i64,
        member_id: &i64,
    ) -> Result<TeamMembership, Error> {
        let mut tx = self.connection_pool.begin().await?;

        let current = find_membership(&mut *tx, *source_team_id, *member_id)
            .await?
            .ok_or(Error::RowNotFound)?;

        sqlx::query("DELETE FROM team_members WHERE team_id = ? AND member_id = ?")
            .bind(source_team_id)
            .bind(member_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO team_members (team_id, member_id, role, joined_at) VALUES (?, ?, ?, ?)")
            .bind(target_team_id)
            .bind(member_id)
            .bind(current.role)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        let moved = find_membership(&mut *tx, *target_team_id, *member_id)
            .await?
            .ok_or(Error::RowNotFound)?;
        tx.commit().await?;

        info!(
            "Member {} moved from team {} to team {}",
            member_id, source_team_id, target_team_id
        );
        Ok(moved)
    }
}

impl Create<Team, CreateTeamDTO> for TeamRepository {
    #[instrument(skip(self, data), fields(department_id = data.department_id, name = %data.name))]
    async fn create(&self, data: &CreateTeamDTO) -> Result<Team, Error> {
        debug!("Creating new team");
        let result = sqlx::query(
            r#"
            INSERT INTO teams (department_id, name, description, leader_member_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(data.department_id)
        .bind(data.name.trim())
        .bind(data.description.as_deref())
        .bind(data.leader_member_id)
        .bind(Utc::now())
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid();
        info!("Team created with id {}", new_id);
        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Team, i64> for TeamRepository {
    async fn read(&self, id: &i64) -> Result<Option<Team>, Error> {
        sqlx::query_as::<_, Team>(&format!("{} WHERE team_id = ?", SELECT_TEAM))
            .bind(id)
            .fetch_optional(&self.connection_pool)
            .await
    }
}

impl Update<Team, UpdateTeamDTO, i64> for TeamRepository {
    #[instrument(skip(self, data))]
    async fn update(&self, id: &i64, data: &UpdateTeamDTO) -> Result<Team, Error> {
        let current = self.read(id).await?.ok_or(Error::RowNotFound)?;

        if data.department_id.is_none()
            && data.name.is_none()
            && data.description.is_none()
            && data.leader_member_id.is_none()
        {
            return Ok(current);
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new("UPDATE teams SET ");
        let mut separated = query_builder.separated(", ");
        if let Some(department_id) = data.department_id {
            separated.push("department_id = ");
            separated.push_bind_unseparated(department_id);
        }
        if let Some(ref name) = data.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name.trim().to_string());
        }
        if let Some(ref description) = data.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description.clone());
        }
        if let Some(leader_member_id) = data.leader_member_id {
            separated.push("leader_member_id = ");
            separated.push_bind_unseparated(leader_member_id);
        }
        query_builder.push(" WHERE team_id = ");
        query_builder.push_bind(*id);
        query_builder.build().execute(&self.connection_pool).await?;

        info!("Team {} updated", id);
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i64> for TeamRepository {
    #[instrument(skip(self))]
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM teams WHERE team_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        ensure_affected(result)?;

        info!("Team {} deleted", id);
        Ok(())
    }
}
