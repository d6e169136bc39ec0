//! Team services - Gestione team e appartenenze dei membri

use crate::core::{AppError, AppState};
use crate::dtos::{
    AddTeamMemberDTO, CreateTeamDTO, MoveTeamMemberDTO, TeamDTO, TeamMemberDTO, TeamQuery,
    UpdateTeamDTO, UpdateTeamMemberDTO,
};
use crate::entities::{TeamMembership, TeamRole};
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

async fn ensure_team_exists(state: &AppState, team_id: i64) -> Result<(), AppError> {
    if state.team.read(&team_id).await?.is_none() {
        warn!("Team {} not found", team_id);
        return Err(AppError::not_found("Team not found"));
    }
    Ok(())
}

async fn ensure_department_exists(state: &AppState, department_id: i64) -> Result<(), AppError> {
    if !state.department.exists(&department_id).await? {
        warn!("Department {} not found", department_id);
        return Err(AppError::not_found("Department not found"));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_teams(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TeamQuery>,
) -> Result<Json<Vec<TeamDTO>>, AppError> {
    debug!("Listing teams");
    let teams = state.team.list(&params).await?;
    Ok(Json(teams.into_iter().map(TeamDTO::from).collect()))
}

#[instrument(skip(state), fields(team_id = %team_id))]
pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
) -> Result<Json<TeamDTO>, AppError> {
    let team = state
        .team
        .read(&team_id)
        .await?
        .ok_or_else(|| AppError::not_found("Team not found"))?;
    Ok(Json(TeamDTO::from(team)))
}

#[instrument(skip(state, body), fields(department_id = %body.department_id, name = %body.name))]
pub async fn create_team(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTeamDTO>,
) -> Result<(StatusCode, Json<TeamDTO>), AppError> {
    body.validate()?;
    ensure_department_exists(&state, body.department_id).await?;

    let team = state.team.create(&body).await?;
    info!("Team {} created", team.team_id);
    Ok((StatusCode::CREATED, Json(TeamDTO::from(team))))
}

#[instrument(skip(state, body), fields(team_id = %team_id))]
pub async fn update_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
    Json(body): Json<UpdateTeamDTO>,
) -> Result<Json<TeamDTO>, AppError> {
    body.validate()?;
    if let Some(department_id) = body.department_id {
        ensure_department_exists(&state, department_id).await?;
    }

    let team = state
        .team
        .update(&team_id, &body)
        .await
        .map_err(|e| AppError::from_db(e, "Team not found"))?;
    Ok(Json(TeamDTO::from(team)))
}

#[instrument(skip(state), fields(team_id = %team_id))]
pub async fn delete_team(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .team
        .delete(&team_id)
        .await
        .map_err(|e| AppError::from_db(e, "Team not found"))?;
    info!("Team deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state), fields(team_id = %team_id))]
pub async fn list_team_members(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
) -> Result<Json<Vec<TeamMemberDTO>>, AppError> {
    ensure_team_exists(&state, team_id).await?;
    let members = state.team.list_members(&team_id).await?;
    Ok(Json(
        members
            .into_iter()
            .map(TeamMemberDTO::with_picture_url)
            .collect(),
    ))
}

#[instrument(skip(state, body), fields(team_id = %team_id, member_id = %body.member_id))]
pub async fn add_team_member(
    State(state): State<Arc<AppState>>,
    Path(team_id): Path<i64>,
    Json(body): Json<AddTeamMemberDTO>,
) -> Result<(StatusCode, Json<TeamMembership>), AppError> {
    // 1. Verificare che team e membro esistano
    // 2. Rifiutare i duplicati con CONFLICT
    // 3. Inserire con il ruolo richiesto (Member se assente)
    ensure_team_exists(&state, team_id).await?;
    if state.member.read(&body.member_id).await?.is_none() {
        return Err(AppError::not_found("Member not found"));
    }

    if state
        .team
        .membership(&team_id, &body.member_id)
        .await?
        .is_some()
    {
        warn!("Member already in team");
        return Err(AppError::conflict("Member is already in this team"));
    }

    let membership = state
        .team
        .add_member(&team_id, &body.member_id, body.role.unwrap_or(TeamRole::Member))
        .await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

#[instrument(skip(state, body), fields(team_id = %team_id, member_id = %member_id))]
pub async fn update_team_member(
    State(state): State<Arc<AppState>>,
    Path((team_id, member_id)): Path<(i64, i64)>,
    Json(body): Json<UpdateTeamMemberDTO>,
) -> Result<Json<TeamMembership>, AppError> {
    let membership = state
        .team
        .update_member_role(&team_id, &member_id, body.role)
        .await
        .map_err(|e| AppError::from_db(e, "Member is not in this team"))?;
    info!("Team role changed to {:?}", membership.role);
    Ok(Json(membership))
}

#[instrument(skip(state), fields(team_id = %team_id, member_id = %member_id))]
pub async fn remove_team_member(
    State(state): State<Arc<AppState>>,
    Path((team_id, member_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    state
        .team
        .remove_member(&team_id, &member_id)
        .await
        .map_err(|e| AppError::from_db(e, "Member is not in this team"))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Drag-and-drop di un membro tra due team
#[instrument(skip(state, body), fields(team_id = %team_id, member_id = %member_id, target_team_id = %body.target_team_id))]
pub async fn move_team_member(
    State(state): State<Arc<AppState>>,
    Path((team_id, member_id)): Path<(i64, i64)>,
    Json(body): Json<MoveTeamMemberDTO>,
) -> Result<Json<TeamMembership>, AppError> {
    if body.target_team_id == team_id {
        return Err(AppError::bad_request("Target team is the same as the source team"));
    }
    ensure_team_exists(&state, team_id).await?;
    ensure_team_exists(&state, body.target_team_id).await?;

    if state
        .team
        .membership(&body.target_team_id, &member_id)
        .await?
        .is_some()
    {
        warn!("Member already in target team");
        return Err(AppError::conflict("Member is already in the target team"));
    }

    let membership = state
        .team
        .move_member(&team_id, &body.target_team_id, &member_id)
        .await
        .map_err(|e| AppError::from_db(e, "Member is not in this team"))?;

    info!("Member moved");
    Ok(Json(membership))
}
