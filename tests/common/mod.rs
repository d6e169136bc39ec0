#![allow(dead_code)]

use axum_test::TestServer;
use axum_test::http::HeaderName;
use church_server::core::AppState;
use church_server::dtos::CreateStaffDTO;
use church_server::entities::{Staff, StaffRole};
use church_server::repositories::Create;
use church_server::storage::UploadStore;
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;

pub const JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";

/// Limite upload usato nei test, volutamente piccolo
pub const TEST_MAX_UPLOAD_BYTES: usize = 1024;

// Staff definito in fixtures/staff.sql
pub const ADMIN_ID: i64 = 1;
pub const PASTOR_ID: i64 = 2;
pub const STAFF_ID: i64 = 3;
pub const INACTIVE_ID: i64 = 4;

/// Crea un AppState per i test
///
/// # Arguments
/// * `pool` - Connection pool SQLite creato da `#[sqlx::test]`
///
/// # Returns
/// Arc<AppState> configurato con il JWT secret di test e una upload dir
/// che i test senza upload non toccano mai
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    let upload_dir = std::env::temp_dir().join("church-server-tests-unused");
    create_test_state_with_uploads(pool, &upload_dir)
}

/// Come [`create_test_state`], con la upload dir indicata
pub fn create_test_state_with_uploads(pool: SqlitePool, upload_dir: &Path) -> Arc<AppState> {
    let uploads = UploadStore::new(upload_dir, TEST_MAX_UPLOAD_BYTES);
    Arc::new(AppState::new(pool, JWT_SECRET.to_string(), uploads))
}

/// Crea un TestServer per i test
///
/// # Arguments
/// * `state` - AppState da utilizzare per il server
///
/// # Returns
/// TestServer configurato e pronto per eseguire richieste
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = church_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Genera un JWT token per testing
///
/// # Arguments
/// * `staff_id` - ID dello staff per cui generare il token
/// * `nickname` - Nickname dello staff
/// * `jwt_secret` - Secret key per firmare il token
///
/// # Returns
/// Token JWT valido per 24 ore
pub fn create_test_jwt(staff_id: i64, nickname: &str, jwt_secret: &str) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Claims {
        id: i64,
        nickname: String,
        exp: usize,
        iat: usize,
    }

    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        id: staff_id,
        nickname: nickname.to_string(),
        exp: expiration,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("Failed to create JWT token")
}

/// Header Authorization pronto da passare a `add_header`
pub fn bearer(staff_id: i64, nickname: &str) -> (HeaderName, String) {
    (
        HeaderName::from_static("authorization"),
        format!("Bearer {}", create_test_jwt(staff_id, nickname, JWT_SECRET)),
    )
}

pub fn admin_auth() -> (HeaderName, String) {
    bearer(ADMIN_ID, "admin")
}

pub fn staff_auth() -> (HeaderName, String) {
    bearer(STAFF_ID, "segreteria")
}

/// Crea uno staff con un PIN vero (le fixture hanno hash fittizi)
pub async fn create_staff_with_pin(
    state: &AppState,
    nickname: &str,
    pin: &str,
    role: StaffRole,
) -> Staff {
    let data = CreateStaffDTO {
        name: format!("Test {}", nickname),
        nickname: nickname.to_string(),
        pin: Staff::hash_pin(pin).expect("Failed to hash PIN"),
        role: Some(role),
        phone: None,
        email: None,
    };
    state
        .staff
        .create(&data)
        .await
        .expect("Failed to create staff")
}
