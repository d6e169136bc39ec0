//! Member services - Gestione membri, assegnazione famiglia e foto profilo

use crate::core::{AppError, AppState};
use crate::dtos::{
    AssignFamilyDTO, CreateMemberDTO, MemberDTO, MemberQuery, MemberTeamDTO, UpdateMemberDTO,
};
use crate::repositories::{Create, Delete, Read, Update};
use crate::storage::read_file_field;
use axum::{
    extract::{Json, Multipart, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

/// Verifica che la famiglia indicata esista (404 altrimenti)
async fn ensure_family_exists(state: &AppState, family_id: Option<i64>) -> Result<(), AppError> {
    if let Some(family_id) = family_id {
        if !state.family.exists(&family_id).await? {
            warn!("Family {} not found", family_id);
            return Err(AppError::not_found("Family not found"));
        }
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MemberQuery>,
) -> Result<Json<Vec<MemberDTO>>, AppError> {
    debug!("Listing members");
    let members = state.member.list(&params).await?;
    info!("Found {} members", members.len());
    Ok(Json(members.into_iter().map(MemberDTO::from).collect()))
}

#[instrument(skip(state), fields(member_id = %member_id))]
pub async fn get_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<i64>,
) -> Result<Json<MemberDTO>, AppError> {
    let member = state
        .member
        .read(&member_id)
        .await?
        .ok_or_else(|| AppError::not_found("Member not found"))?;
    Ok(Json(MemberDTO::from(member)))
}

#[instrument(skip(state, body), fields(family_id = ?body.family_id))]
pub async fn create_member(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateMemberDTO>,
) -> Result<(StatusCode, Json<MemberDTO>), AppError> {
    body.validate()?;
    ensure_family_exists(&state, body.family_id).await?;

    let member = state.member.create(&body).await?;
    info!("Member {} created", member.member_id);
    Ok((StatusCode::CREATED, Json(MemberDTO::from(member))))
}

#[instrument(skip(state, body), fields(member_id = %member_id))]
pub async fn update_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<i64>,
    Json(body): Json<UpdateMemberDTO>,
) -> Result<Json<MemberDTO>, AppError> {
    body.validate()?;
    let member = state
        .member
        .update(&member_id, &body)
        .await
        .map_err(|e| AppError::from_db(e, "Member not found"))?;
    Ok(Json(MemberDTO::from(member)))
}

#[instrument(skip(state), fields(member_id = %member_id))]
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let member = state
        .member
        .read(&member_id)
        .await?
        .ok_or_else(|| AppError::not_found("Member not found"))?;

    state
        .member
        .delete(&member_id)
        .await
        .map_err(|e| AppError::from_db(e, "Member not found"))?;

    if let Some(picture) = member.profile_picture.as_deref() {
        if let Err(e) = state.uploads.remove(picture).await {
            // il membro è già cancellato, il file orfano non blocca la risposta
            warn!("Failed to remove picture {} of deleted member: {:?}", picture, e);
        }
    }

    info!("Member {} ({}) deleted", member_id, member.full_name());
    Ok(StatusCode::NO_CONTENT)
}

/// Sposta il membro in un'altra famiglia (drag-and-drop) o lo stacca dalla famiglia
#[instrument(skip(state, body), fields(member_id = %member_id, family_id = ?body.family_id))]
pub async fn assign_family(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<i64>,
    Json(body): Json<AssignFamilyDTO>,
) -> Result<Json<MemberDTO>, AppError> {
    let family_id = body.family_id.ok_or_else(|| {
        warn!("Family assignment without family_id");
        AppError::bad_request("Missing family_id")
            .with_details("Send a family id, or null to detach the member")
    })?;
    ensure_family_exists(&state, family_id).await?;

    let member = state
        .member
        .assign_family(&member_id, family_id, body.relationship)
        .await
        .map_err(|e| AppError::from_db(e, "Member not found"))?;

    info!("Member re-assigned");
    Ok(Json(MemberDTO::from(member)))
}

#[instrument(skip(state), fields(member_id = %member_id))]
pub async fn list_member_teams(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<i64>,
) -> Result<Json<Vec<MemberTeamDTO>>, AppError> {
    if state.member.read(&member_id).await?.is_none() {
        return Err(AppError::not_found("Member not found"));
    }
    let teams = state.team.teams_of_member(&member_id).await?;
    Ok(Json(teams))
}

#[instrument(skip(state, multipart), fields(member_id = %member_id))]
pub async fn upload_member_picture(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<MemberDTO>, AppError> {
    // 1. Verificare che il membro esista prima di leggere il body
    // 2. Salvare il file (tipo e dimensione validati dallo storage)
    // 3. Aggiornare il membro; se fallisce, cancellare il file appena scritto
    // 4. Cancellare la foto precedente
    let previous = state
        .member
        .read(&member_id)
        .await?
        .ok_or_else(|| AppError::not_found("Member not found"))?
        .profile_picture;

    let file = read_file_field(&mut multipart).await?;
    let stored_name = state.uploads.save_image(&file).await?;

    let member = match state
        .member
        .set_profile_picture(&member_id, Some(&stored_name))
        .await
    {
        Ok(member) => member,
        Err(e) => {
            error!("Failed to store picture reference: {:?}", e);
            state.uploads.remove(&stored_name).await?;
            return Err(AppError::from_db(e, "Member not found"));
        }
    };

    if let Some(previous) = previous.as_deref() {
        if let Err(e) = state.uploads.remove(previous).await {
            warn!("Failed to remove previous picture {}: {:?}", previous, e);
        }
    }

    info!("Profile picture updated");
    Ok(Json(MemberDTO::from(member)))
}

#[instrument(skip(state), fields(member_id = %member_id))]
pub async fn delete_member_picture(
    State(state): State<Arc<AppState>>,
    Path(member_id): Path<i64>,
) -> Result<Json<MemberDTO>, AppError> {
    let previous = state
        .member
        .read(&member_id)
        .await?
        .ok_or_else(|| AppError::not_found("Member not found"))?
        .profile_picture;

    let member = state
        .member
        .set_profile_picture(&member_id, None)
        .await
        .map_err(|e| AppError::from_db(e, "Member not found"))?;

    if let Some(previous) = previous.as_deref() {
        state.uploads.remove(previous).await?;
    }

    info!("Profile picture removed");
    Ok(Json(MemberDTO::from(member)))
}
