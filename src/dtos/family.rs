//! Family DTOs - Data Transfer Objects per famiglie

use super::member::{CreateMemberDTO, MemberDTO};
use crate::entities::{Family, FamilyStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FamilyDTO {
    pub family_id: i64,
    pub family_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: FamilyStatus,
    pub registered_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Family> for FamilyDTO {
    fn from(value: Family) -> Self {
        Self {
            family_id: value.family_id,
            family_name: value.family_name,
            address: value.address,
            phone: value.phone,
            email: value.email,
            status: value.status,
            registered_on: value.registered_on,
            notes: value.notes,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Famiglia con la lista dei suoi membri (pagina di dettaglio)
#[derive(Serialize, Deserialize, Debug)]
pub struct FamilyDetailDTO {
    #[serde(flatten)]
    pub family: FamilyDTO,
    pub members: Vec<MemberDTO>,
}

/// DTO per creare una nuova famiglia (senza family_id).
/// `members` permette di salvare in un colpo solo il form a schede famiglia + membri.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateFamilyDTO {
    #[validate(length(min = 1, max = 100, message = "Family name must be between 1 and 100 characters"))]
    pub family_name: String,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub status: Option<FamilyStatus>,
    pub registered_on: Option<NaiveDate>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    // validati uno per uno nel service
    #[serde(default)]
    pub members: Vec<CreateMemberDTO>,
}

/// DTO per aggiornare una famiglia (solo i campi presenti vengono modificati)
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateFamilyDTO {
    #[validate(length(min = 1, max = 100, message = "Family name must be between 1 and 100 characters"))]
    pub family_name: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub status: Option<FamilyStatus>,
    pub registered_on: Option<NaiveDate>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}
