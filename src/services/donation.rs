//! Donation services - Registrazione offerte e riepiloghi

use crate::core::{AppError, AppState};
use crate::dtos::{
    CreateDonationDTO, DonationDTO, DonationQuery, DonationSummaryDTO, UpdateDonationDTO,
};
use crate::entities::Staff;
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Controlla i riferimenti a membro e famiglia.
/// Ritorna la famiglia del membro, se ne ha una.
async fn check_references(
    state: &AppState,
    member_id: Option<i64>,
    family_id: Option<i64>,
) -> Result<Option<i64>, AppError> {
    let mut member_family = None;
    if let Some(member_id) = member_id {
        let member = state.member.read(&member_id).await?.ok_or_else(|| {
            warn!("Donation references unknown member {}", member_id);
            AppError::not_found("Member not found")
        })?;
        member_family = member.family_id;
    }
    if let Some(family_id) = family_id {
        if !state.family.exists(&family_id).await? {
            warn!("Donation references unknown family {}", family_id);
            return Err(AppError::not_found("Family not found"));
        }
    }
    Ok(member_family)
}

#[instrument(skip(state))]
pub async fn list_donations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DonationQuery>,
) -> Result<Json<Vec<DonationDTO>>, AppError> {
    debug!("Listing donations");
    let donations = state.donation.list(&params).await?;
    Ok(Json(donations.into_iter().map(DonationDTO::from).collect()))
}

#[instrument(skip(state))]
pub async fn donation_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DonationQuery>,
) -> Result<Json<DonationSummaryDTO>, AppError> {
    let totals = state.donation.totals_by_type(&params).await?;
    let summary = DonationSummaryDTO::from_totals(totals);
    info!(
        "Summary: {} donations, total {}",
        summary.donation_count, summary.total_amount
    );
    Ok(Json(summary))
}

#[instrument(skip(state), fields(donation_id = %donation_id))]
pub async fn get_donation(
    State(state): State<Arc<AppState>>,
    Path(donation_id): Path<i64>,
) -> Result<Json<DonationDTO>, AppError> {
    let donation = state
        .donation
        .read(&donation_id)
        .await?
        .ok_or_else(|| AppError::not_found("Donation not found"))?;
    Ok(Json(DonationDTO::from(donation)))
}

#[instrument(skip(state, current_staff, body), fields(staff_id = %current_staff.staff_id, member_id = ?body.member_id))]
pub async fn create_donation(
    State(state): State<Arc<AppState>>,
    Extension(current_staff): Extension<Staff>,
    Json(mut body): Json<CreateDonationDTO>,
) -> Result<(StatusCode, Json<DonationDTO>), AppError> {
    // 1. Validare importo e campi
    // 2. Verificare che membro e famiglia esistano
    // 3. Se c'è solo il membro, attribuire l'offerta anche alla sua famiglia
    // 4. Registrare chi ha inserito l'offerta
    body.validate()?;

    let member_family = check_references(&state, body.member_id, body.family_id).await?;
    if body.family_id.is_none() {
        body.family_id = member_family;
    }
    body.recorded_by = Some(current_staff.staff_id);

    let donation = state.donation.create(&body).await?;
    info!("Donation {} recorded", donation.donation_id);
    Ok((StatusCode::CREATED, Json(DonationDTO::from(donation))))
}

#[instrument(skip(state, body), fields(donation_id = %donation_id))]
pub async fn update_donation(
    State(state): State<Arc<AppState>>,
    Path(donation_id): Path<i64>,
    Json(body): Json<UpdateDonationDTO>,
) -> Result<Json<DonationDTO>, AppError> {
    body.validate()?;
    check_references(&state, body.member_id, body.family_id).await?;

    let donation = state
        .donation
        .update(&donation_id, &body)
        .await
        .map_err(|e| AppError::from_db(e, "Donation not found"))?;
    Ok(Json(DonationDTO::from(donation)))
}

#[instrument(skip(state), fields(donation_id = %donation_id))]
pub async fn delete_donation(
    State(state): State<Arc<AppState>>,
    Path(donation_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .donation
        .delete(&donation_id)
        .await
        .map_err(|e| AppError::from_db(e, "Donation not found"))?;
    Ok(StatusCode::NO_CONTENT)
}
