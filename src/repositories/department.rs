//! DepartmentRepository - Repository per la gestione dei reparti

use super::{Create, Delete, Read, Update, ensure_affected};
use crate::dtos::{CreateDepartmentDTO, UpdateDepartmentDTO};
use crate::entities::Department;
use chrono::Utc;
use sqlx::{Error, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info, instrument};

// DEPARTMENT REPOSITORY
pub struct DepartmentRepository {
    connection_pool: SqlitePool,
}

impl DepartmentRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Department>, Error> {
        let departments = sqlx::query_as::<_, Department>(
            r#"
            SELECT department_id, name, description, leader_member_id, created_at
            FROM departments
            ORDER BY name, department_id
            "#,
        )
        .fetch_all(&self.connection_pool)
        .await?;

        debug!("Found {} departments", departments.len());
        Ok(departments)
    }

    pub async fn exists(&self, department_id: &i64) -> Result<bool, Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM departments WHERE department_id = ?")
                .bind(department_id)
                .fetch_one(&self.connection_pool)
                .await?;
        Ok(count > 0)
    }
}

impl Create<Department, CreateDepartmentDTO> for DepartmentRepository {
    #[instrument(skip(self, data), fields(name = %data.name))]
    async fn create(&self, data: &CreateDepartmentDTO) -> Result<Department, Error> {
        debug!("Creating new department");
        let result = sqlx::query(
            "INSERT INTO departments (name, description, leader_member_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(data.name.trim())
        .bind(data.description.as_deref())
        .bind(data.leader_member_id)
        .bind(Utc::now())
        .execute(&self.connection_pool)
        .await?;

        let new_id = result.last_insert_rowid();
        info!("Department created with id {}", new_id);
        self.read(&new_id).await?.ok_or(Error::RowNotFound)
    }
}

impl Read<Department, i64> for DepartmentRepository {
    async fn read(&self, id: &i64) -> Result<Option<Department>, Error> {
        sqlx::query_as::<_, Department>(
            r#"
            SELECT department_id, name, description, leader_member_id, created_at
            FROM departments
            WHERE department_id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
    }
}

impl Update<Department, UpdateDepartmentDTO, i64> for DepartmentRepository {
    #[instrument(skip(self, data))]
    async fn update(&self, id: &i64, data: &UpdateDepartmentDTO) -> Result<Department, Error> {
        let current = self.read(id).await?.ok_or(Error::RowNotFound)?;

        if data.name.is_none() && data.description.is_none() && data.leader_member_id.is_none() {
            return Ok(current);
        }

        let mut query_builder = QueryBuilder::<Sqlite>::new("UPDATE departments SET ");
        let mut separated = query_builder.separated(", ");
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
        query_builder.push(" WHERE department_id = ");
        query_builder.push_bind(*id);
        query_builder.build().execute(&self.connection_pool).await?;

        info!("Department {} updated", id);
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

impl Delete<i64> for DepartmentRepository {
    #[instrument(skip(self))]
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        // ON DELETE CASCADE cancella i team e le relative appartenenze
        let result = sqlx::query("DELETE FROM departments WHERE department_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;
        ensure_affected(result)?;

        info!("Department {} deleted", id);
        Ok(())
    }
}
