//! Department services - Gestione reparti

use crate::core::{AppError, AppState};
use crate::dtos::{
    CreateDepartmentDTO, DepartmentDTO, DepartmentDetailDTO, TeamDTO, TeamQuery,
    UpdateDepartmentDTO,
};
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

#[instrument(skip(state))]
pub async fn list_departments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DepartmentDTO>>, AppError> {
    debug!("Listing departments");
    let departments = state.department.list().await?;
    Ok(Json(departments.into_iter().map(DepartmentDTO::from).collect()))
}

#[instrument(skip(state), fields(department_id = %department_id))]
pub async fn get_department(
    State(state): State<Arc<AppState>>,
    Path(department_id): Path<i64>,
) -> Result<Json<DepartmentDetailDTO>, AppError> {
    let department = state
        .department
        .read(&department_id)
        .await?
        .ok_or_else(|| AppError::not_found("Department not found"))?;

    let teams = state
        .team
        .list(&TeamQuery {
            department_id: Some(department_id),
        })
        .await?;

    Ok(Json(DepartmentDetailDTO {
        department: DepartmentDTO::from(department),
        teams: teams.into_iter().map(TeamDTO::from).collect(),
    }))
}

#[instrument(skip(state, body), fields(name = %body.name))]
pub async fn create_department(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateDepartmentDTO>,
) -> Result<(StatusCode, Json<DepartmentDTO>), AppError> {
    body.validate()?;
    let department = state.department.create(&body).await?;
    info!("Department {} created", department.department_id);
    Ok((StatusCode::CREATED, Json(DepartmentDTO::from(department))))
}

#[instrument(skip(state, body), fields(department_id = %department_id))]
pub async fn update_department(
    State(state): State<Arc<AppState>>,
    Path(department_id): Path<i64>,
    Json(body): Json<UpdateDepartmentDTO>,
) -> Result<Json<DepartmentDTO>, AppError> {
    body.validate()?;
    let department = state
        .department
        .update(&department_id, &body)
        .await
        .map_err(|e| AppError::from_db(e, "Department not found"))?;
    Ok(Json(DepartmentDTO::from(department)))
}

/// Cancella il reparto insieme ai suoi team e alle relative appartenenze
#[instrument(skip(state), fields(department_id = %department_id))]
pub async fn delete_department(
    State(state): State<Arc<AppState>>,
    Path(department_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .department
        .delete(&department_id)
        .await
        .map_err(|e| AppError::from_db(e, "Department not found"))?;
    info!("Department deleted");
    Ok(StatusCode::NO_CONTENT)
}
