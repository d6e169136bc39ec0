//! Staff services - Gestione account dello staff (solo Admin per le modifiche)

use crate::core::{AppError, AppState, require_role};
use crate::dtos::{CreateStaffDTO, StaffDTO, UpdateStaffDTO};
use crate::entities::{Staff, StaffRole};
use crate::repositories::{Create, Delete, Read, Update};
use crate::storage::read_file_field;
use axum::{
    Extension,
    extract::{Json, Multipart, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

fn hash_pin(pin: &str) -> Result<String, AppError> {
    Staff::hash_pin(pin).map_err(|e| {
        error!("Failed to hash PIN: {:?}", e);
        AppError::internal_server_error("Failed to hash PIN")
    })
}

/// Il nickname deve restare univoco (409 se è di un altro account)
async fn ensure_nickname_free(
    state: &AppState,
    nickname: &str,
    exclude_staff_id: Option<i64>,
) -> Result<(), AppError> {
    if let Some(existing) = state.staff.find_by_nickname(nickname.trim()).await? {
        if Some(existing.staff_id) != exclude_staff_id {
            warn!("Nickname already taken");
            return Err(AppError::conflict("Nickname already in use"));
        }
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_staff(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StaffDTO>>, AppError> {
    debug!("Listing staff");
    let staff = state.staff.list().await?;
    Ok(Json(staff.into_iter().map(StaffDTO::from).collect()))
}

#[instrument(skip(state), fields(staff_id = %staff_id))]
pub async fn get_staff(
    State(state): State<Arc<AppState>>,
    Path(staff_id): Path<i64>,
) -> Result<Json<StaffDTO>, AppError> {
    let staff = state
        .staff
        .read(&staff_id)
        .await?
        .ok_or_else(|| AppError::not_found("Staff not found"))?;
    Ok(Json(StaffDTO::from(staff)))
}

#[instrument(skip(state, current_staff, body), fields(admin_id = %current_staff.staff_id, nickname = %body.nickname))]
pub async fn create_staff(
    State(state): State<Arc<AppState>>,
    Extension(current_staff): Extension<Staff>,
    Json(mut body): Json<CreateStaffDTO>,
) -> Result<(StatusCode, Json<StaffDTO>), AppError> {
    // 1. Solo gli Admin possono creare account
    // 2. Validare i campi e controllare che il nickname sia libero
    // 3. Salvare l'hash del PIN, mai il PIN in chiaro
    require_role(&current_staff, &[StaffRole::Admin])?;
    body.validate()?;
    ensure_nickname_free(&state, &body.nickname, None).await?;

    body.pin = hash_pin(&body.pin)?;
    let staff = state.staff.create(&body).await?;

    info!("Staff {} created", staff.staff_id);
    Ok((StatusCode::CREATED, Json(StaffDTO::from(staff))))
}

#[instrument(skip(state, current_staff, body), fields(admin_id = %current_staff.staff_id, staff_id = %staff_id))]
pub async fn update_staff(
    State(state): State<Arc<AppState>>,
    Extension(current_staff): Extension<Staff>,
    Path(staff_id): Path<i64>,
    Json(mut body): Json<UpdateStaffDTO>,
) -> Result<Json<StaffDTO>, AppError> {
    require_role(&current_staff, &[StaffRole::Admin])?;
    body.validate()?;

    if let Some(ref nickname) = body.nickname {
        ensure_nickname_free(&state, nickname, Some(staff_id)).await?;
    }
    if let Some(pin) = body.pin.take() {
        body.pin = Some(hash_pin(&pin)?);
    }

    let staff = state
        .staff
        .update(&staff_id, &body)
        .await
        .map_err(|e| AppError::from_db(e, "Staff not found"))?;

    info!("Staff updated");
    Ok(Json(StaffDTO::from(staff)))
}

#[instrument(skip(state, current_staff), fields(admin_id = %current_staff.staff_id, staff_id = %staff_id))]
pub async fn delete_staff(
    State(state): State<Arc<AppState>>,
    Extension(current_staff): Extension<Staff>,
    Path(staff_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    require_role(&current_staff, &[StaffRole::Admin])?;

    if current_staff.staff_id == staff_id {
        warn!("Admin tried to delete their own account");
        return Err(AppError::bad_request("You cannot delete your own account"));
    }

    let staff = state
        .staff
        .read(&staff_id)
        .await?
        .ok_or_else(|| AppError::not_found("Staff not found"))?;

    state
        .staff
        .delete(&staff_id)
        .await
        .map_err(|e| AppError::from_db(e, "Staff not found"))?;

    if let Some(picture) = staff.profile_picture.as_deref() {
        if let Err(e) = state.uploads.remove(picture).await {
            warn!("Failed to remove picture {} of deleted staff: {:?}", picture, e);
        }
    }

    info!("Staff deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_staff, multipart), fields(current_id = %current_staff.staff_id, staff_id = %staff_id))]
pub async fn upload_staff_picture(
    State(state): State<Arc<AppState>>,
    Extension(current_staff): Extension<Staff>,
    Path(staff_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<StaffDTO>, AppError> {
    if current_staff.staff_id != staff_id && !current_staff.is_admin() {
        warn!("Staff {} tried to change the picture of staff {}", current_staff.staff_id, staff_id);
        return Err(AppError::forbidden("You can only change your own picture"));
    }

    let previous = state
        .staff
        .read(&staff_id)
        .await?
        .ok_or_else(|| AppError::not_found("Staff not found"))?
        .profile_picture;

    let file = read_file_field(&mut multipart).await?;
    let stored_name = state.uploads.save_image(&file).await?;

    let staff = match state
        .staff
        .set_profile_picture(&staff_id, Some(&stored_name))
        .await
    {
        Ok(staff) => staff,
        Err(e) => {
            error!("Failed to store picture reference: {:?}", e);
            state.uploads.remove(&stored_name).await?;
            return Err(AppError::from_db(e, "Staff not found"));
        }
    };

    if let Some(previous) = previous.as_deref() {
        if let Err(e) = state.uploads.remove(previous).await {
            warn!("Failed to remove previous picture {}: {:?}", previous, e);
        }
    }

    info!("Staff picture updated");
    Ok(Json(StaffDTO::from(staff)))
}
