//! Staff entity - Entità staff con metodi per gestione PIN

use super::enums::StaffRole;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Staff {
    pub staff_id: i64,
    pub name: String,
    pub nickname: String,
    #[serde(skip_serializing)]
    pub pin_hash: String,
    pub role: StaffRole,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub profile_picture: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Staff {
    /// Verify if target_pin matches the stored hashed PIN
    pub fn verify_pin(&self, target_pin: &str) -> bool {
        verify(target_pin, &self.pin_hash).unwrap_or(false)
    }

    /// Hash a PIN using bcrypt with default cost
    pub fn hash_pin(pin: &str) -> Result<String, bcrypt::BcryptError> {
        let hash = hash(pin, DEFAULT_COST)?;
        Ok(hash)
    }

    pub fn is_admin(&self) -> bool {
        self.role == StaffRole::Admin
    }
}
