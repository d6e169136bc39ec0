//! Auth services - Login staff con nickname + PIN

use crate::core::auth::TOKEN_LIFETIME_HOURS;
use crate::core::{AppError, AppState, encode_jwt};
use crate::dtos::{CreateStaffDTO, LoginDTO, StaffDTO};
use crate::entities::{Staff, StaffRole};
use crate::repositories::Create;
use axum::{
    Extension,
    extract::{Json, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, body), fields(nickname = %body.nickname))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginDTO>, // JSON body
) -> Result<impl IntoResponse, AppError> {
    // 1. Verificare che il PIN sia presente (fail-fast prima della query DB)
    // 2. Cercare lo staff tramite nickname, se non esiste UNAUTHORIZED
    // 3. Verificare il PIN con l'hash salvato, se non corrisponde UNAUTHORIZED
    // 4. Rifiutare gli account disattivati
    // 5. Generare il token JWT e restituirlo sia come cookie HttpOnly sia nell'header Authorization
    debug!("Login attempt");

    if body.pin.is_empty() {
        return Err(AppError::unauthorized("Invalid nickname or PIN"));
    }

    let staff = match state.staff.find_by_nickname(body.nickname.trim()).await? {
        Some(staff) => staff,
        None => {
            warn!("Login with unknown nickname");
            return Err(AppError::unauthorized("Invalid nickname or PIN"));
        }
    };

    if !staff.verify_pin(&body.pin) {
        warn!("Login with wrong PIN");
        return Err(AppError::unauthorized("Invalid nickname or PIN"));
    }

    if !staff.is_active {
        warn!("Login attempt on disabled account");
        return Err(AppError::unauthorized("Your account is disabled"));
    }

    let token = encode_jwt(staff.nickname.clone(), staff.staff_id, &state.jwt_secret)?;

    let cookie_value = format!(
        "token={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        token,
        TOKEN_LIFETIME_HOURS * 60 * 60
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie_value)
            .map_err(|_| AppError::internal_server_error("Failed to build cookie"))?,
    );
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::internal_server_error("Failed to build token header"))?,
    );

    info!("Staff {} logged in", staff.staff_id);
    Ok((StatusCode::OK, headers, Json(StaffDTO::from(staff))))
}

#[instrument(skip(current_staff), fields(staff_id = %current_staff.staff_id))]
pub async fn me(Extension(current_staff): Extension<Staff>) -> Json<StaffDTO> {
    Json(StaffDTO::from(current_staff))
}

pub async fn logout() -> impl IntoResponse {
    // Cookie con Max-Age=0 per forzare il logout lato client
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_static("token=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0"),
    );
    (StatusCode::OK, headers)
}

/// Crea l'amministratore iniziale se la tabella staff è vuota.
///
/// # Returns
/// * `Ok(Some(staff))` - amministratore creato
/// * `Ok(None)` - esiste già dello staff, nessuna modifica
#[instrument(skip(state, pin))]
pub async fn bootstrap_admin(
    state: &AppState,
    nickname: &str,
    pin: &str,
) -> Result<Option<Staff>, AppError> {
    if state.staff.count().await? > 0 {
        debug!("Staff already present, skipping admin bootstrap");
        return Ok(None);
    }

    let mut data = CreateStaffDTO {
        name: "Administrator".to_string(),
        nickname: nickname.to_string(),
        pin: pin.to_string(),
        role: Some(StaffRole::Admin),
        phone: None,
        email: None,
    };
    data.validate()?;

    data.pin = Staff::hash_pin(&data.pin)
        .map_err(|_| AppError::internal_server_error("Failed to hash PIN"))?;

    let admin = state.staff.create(&data).await?;
    info!("Bootstrap admin '{}' created", admin.nickname);
    Ok(Some(admin))
}
