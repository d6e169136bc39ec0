use crate::core::{AppError, AppState};
use crate::entities::{Staff, StaffRole};
use crate::repositories::Read;
use axum::extract::State;
use axum::{Error, body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Durata del token (e del cookie) in ore
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

// struct che codifica il contenuto del token jwt
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    pub id: i64,
    pub nickname: String,
}

#[instrument(skip(secret), fields(nickname = %nickname, id = %id))]
pub fn encode_jwt(nickname: String, id: i64, secret: &str) -> Result<String, Error> {
    debug!("Encoding JWT token for staff");
    let now = Utc::now();
    let expire = Duration::hours(TOKEN_LIFETIME_HOURS);
    let exp: usize = (now + expire).timestamp() as usize;
    let iat: usize = now.timestamp() as usize;
    let claim = Claims {
        iat,
        exp,
        nickname,
        id,
    };

    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map(|token| {
        info!("JWT token encoded successfully");
        token
    })
    .map_err(|e| {
        error!("Failed to encode JWT token: {:?}", e);
        Error::new("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, Error> {
    debug!("Decoding JWT token");
    decode::<Claims>(
        jwt_token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| {
        debug!("JWT token decoded successfully for staff: {}", data.claims.nickname);
        data
    })
    .map_err(|e| {
        warn!("Failed to decode JWT token: {:?}", e);
        Error::new("Error in decoding jwt token")
    })
}

/// Estrae il token dalla richiesta: prima l'header `Authorization: Bearer`,
/// poi il cookie `token` impostato dal login
fn extract_token(req: &Request) -> Result<Option<String>, AppError> {
    if let Some(header) = req.headers().get(http::header::AUTHORIZATION) {
        let value = header.to_str().map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::forbidden("Invalid authorization header")
        })?;
        let mut parts = value.split_whitespace();
        return match (parts.next(), parts.next()) {
            (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => {
                Ok(Some(token.to_string()))
            }
            _ => {
                warn!("Authorization header is not a bearer token");
                Err(AppError::forbidden("Authorization header must be 'Bearer <token>'"))
            }
        };
    }

    let token = req
        .headers()
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix("token="))
        .find(|token| !token.is_empty())
        .map(str::to_string);

    Ok(token)
}

#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    debug!("Running authentication middleware");
    let token = extract_token(&req)?.ok_or_else(|| {
        warn!("Missing authentication token");
        AppError::forbidden("Please add the JWT token to the header")
    })?;

    let token_data = decode_jwt(&token, &state.jwt_secret).map_err(|_| {
        warn!("Failed to decode JWT token");
        AppError::unauthorized("Unable to decode token")
    })?;

    // Recupero dello staff dal database, il token da solo non basta:
    // lo staff potrebbe essere stato disattivato o cancellato nel frattempo
    let current_staff = match state.staff.read(&token_data.claims.id).await? {
        Some(staff) if staff.is_active => {
            debug!("Staff authenticated: {}", staff.nickname);
            staff
        }
        Some(staff) => {
            warn!("Inactive staff tried to authenticate: {}", staff.nickname);
            return Err(AppError::unauthorized("Your account is disabled"));
        }
        None => {
            warn!("Staff not found in database: {}", token_data.claims.nickname);
            return Err(AppError::unauthorized("You are not an authorized user"));
        }
    };
    req.extensions_mut().insert(current_staff);
    Ok(next.run(req).await)
}

/// Helper function per verificare che lo staff abbia uno dei ruoli richiesti
///
/// # Arguments
/// * `staff` - Lo staff autenticato
/// * `allowed_roles` - Lista di ruoli permessi
///
/// # Returns
/// * `Ok(())` se il ruolo è permesso
/// * `Err(AppError)` se il ruolo non è tra quelli permessi
#[instrument(skip(staff), fields(staff_id = %staff.staff_id))]
pub fn require_role(staff: &Staff, allowed_roles: &[StaffRole]) -> Result<(), AppError> {
    if !allowed_roles.contains(&staff.role) {
        warn!(
            "Staff {} has insufficient role {:?}, required one of: {:?}",
            staff.staff_id, staff.role, allowed_roles
        );
        return Err(AppError::forbidden("Insufficient role").with_details(format!(
            "This action requires one of the following roles: {:?}",
            allowed_roles
        )));
    }

    debug!("Role check passed for staff {} with role {:?}", staff.staff_id, staff.role);
    Ok(())
}
