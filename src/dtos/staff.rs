//! Staff DTOs - Data Transfer Objects per lo staff

use crate::entities::{Staff, StaffRole};
use crate::storage::picture_url;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    /// PIN numerico di 4-8 cifre
    pub static ref PIN_REGEX: Regex = Regex::new(r"^[0-9]{4,8}$").unwrap();
    /// Nickname: lettere, numeri, punto, trattino e underscore
    pub static ref NICKNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9._-]{3,30}$").unwrap();
}

/// Struct per gestire io col client (il PIN non viene mai esposto)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StaffDTO {
    pub staff_id: i64,
    pub name: String,
    pub nickname: String,
    pub role: StaffRole,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub profile_picture_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Staff> for StaffDTO {
    fn from(value: Staff) -> Self {
        Self {
            staff_id: value.staff_id,
            name: value.name,
            nickname: value.nickname,
            role: value.role,
            phone: value.phone,
            email: value.email,
            profile_picture_url: value.profile_picture.as_deref().map(picture_url),
            is_active: value.is_active,
            created_at: value.created_at,
        }
    }
}

/// DTO per il login (solo nickname e PIN)
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginDTO {
    pub nickname: String,
    pub pin: String,
}

/// DTO per creare un nuovo membro dello staff.
/// Il repository riceve `pin` già hashato.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateStaffDTO {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(regex(path = *NICKNAME_REGEX, message = "Nickname must be 3-30 characters: letters, digits, '.', '_' or '-'"))]
    pub nickname: String,
    #[validate(regex(path = *PIN_REGEX, message = "PIN must be 4 to 8 digits"))]
    pub pin: String,
    pub role: Option<StaffRole>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
}

/// DTO per aggiornare lo staff (solo campi modificabili)
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateStaffDTO {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(regex(path = *NICKNAME_REGEX, message = "Nickname must be 3-30 characters: letters, digits, '.', '_' or '-'"))]
    pub nickname: Option<String>,
    #[validate(regex(path = *PIN_REGEX, message = "PIN must be 4 to 8 digits"))]
    pub pin: Option<String>,
    pub role: Option<StaffRole>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto(nickname: &str, pin: &str) -> CreateStaffDTO {
        CreateStaffDTO {
            name: "Mario Rossi".to_string(),
            nickname: nickname.to_string(),
            pin: pin.to_string(),
            role: None,
            phone: None,
            email: None,
        }
    }

    #[test]
    fn valid_staff() {
        assert!(create_dto("mario.rossi", "1234").validate().is_ok());
        assert!(create_dto("mr", "12345678").validate().is_err());
    }

    #[test]
    fn pin_must_be_digits() {
        assert!(create_dto("mario", "12a4").validate().is_err());
        assert!(create_dto("mario", "123").validate().is_err());
        assert!(create_dto("mario", "123456789").validate().is_err());
    }

    #[test]
    fn partial_update_validates_only_present_fields() {
        let dto = UpdateStaffDTO {
            pin: Some("99".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
        assert!(UpdateStaffDTO::default().validate().is_ok());
    }
}
