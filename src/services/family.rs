//! Family services - Gestione famiglie

use crate::core::{AppError, AppState};
use crate::dtos::{
    CreateFamilyDTO, FamilyDTO, FamilyDetailDTO, FamilyQuery, MemberDTO, UpdateFamilyDTO,
};
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state))]
pub async fn list_families(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FamilyQuery>,
) -> Result<Json<Vec<FamilyDTO>>, AppError> {
    debug!("Listing families");
    let families = state.family.list(&params).await?;
    info!("Found {} families", families.len());
    Ok(Json(families.into_iter().map(FamilyDTO::from).collect()))
}

/// Carica famiglia + membri per la pagina di dettaglio
async fn load_detail(state: &AppState, family_id: i64) -> Result<FamilyDetailDTO, AppError> {
    let family = state.family.read(&family_id).await?.ok_or_else(|| {
        warn!("Family {} not found", family_id);
        AppError::not_found("Family not found")
    })?;
    let members = state.member.list_by_family(&family_id).await?;

    Ok(FamilyDetailDTO {
        family: FamilyDTO::from(family),
        members: members.into_iter().map(MemberDTO::from).collect(),
    })
}

#[instrument(skip(state), fields(family_id = %family_id))]
pub async fn get_family(
    State(state): State<Arc<AppState>>,
    Path(family_id): Path<i64>,
) -> Result<Json<FamilyDetailDTO>, AppError> {
    debug!("Fetching family");
    Ok(Json(load_detail(&state, family_id).await?))
}

#[instrument(skip(state, body), fields(family_name = %body.family_name))]
pub async fn create_family(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateFamilyDTO>,
) -> Result<(StatusCode, Json<FamilyDetailDTO>), AppError> {
    // 1. Validare i dati della famiglia e di ciascun membro del form
    // 2. Salvare famiglia e membri in una sola transazione
    // 3. Ritornare il dettaglio completo, come lo mostra la pagina famiglia
    body.validate()?;
    for member in &body.members {
        member.validate()?;
    }

    let family = state.family.create(&body).await?;
    info!("Family {} created", family.family_id);

    let detail = load_detail(&state, family.family_id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

#[instrument(skip(state, body), fields(family_id = %family_id))]
pub async fn update_family(
    State(state): State<Arc<AppState>>,
    Path(family_id): Path<i64>,
    Json(body): Json<UpdateFamilyDTO>,
) -> Result<Json<FamilyDTO>, AppError> {
    body.validate()?;
    let family = state
        .family
        .update(&family_id, &body)
        .await
        .map_err(|e| AppError::from_db(e, "Family not found"))?;
    info!("Family updated");
    Ok(Json(FamilyDTO::from(family)))
}

#[instrument(skip(state), fields(family_id = %family_id))]
pub async fn delete_family(
    State(state): State<Arc<AppState>>,
    Path(family_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .family
        .delete(&family_id)
        .await
        .map_err(|e| AppError::from_db(e, "Family not found"))?;
    info!("Family deleted, its members are now unassigned");
    Ok(StatusCode::NO_CONTENT)
}
