//! Member DTOs - Data Transfer Objects per membri

use crate::entities::{FamilyRelationship, Gender, Member, MemberStatus};
use crate::storage::picture_url;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MemberDTO {
    pub member_id: i64,
    pub family_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub relationship: Option<FamilyRelationship>,
    pub status: MemberStatus,
    pub baptized: bool,
    pub baptism_date: Option<NaiveDate>,
    pub profile_picture_url: Option<String>,
    pub registered_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Member> for MemberDTO {
    fn from(value: Member) -> Self {
        Self {
            member_id: value.member_id,
            family_id: value.family_id,
            first_name: value.first_name,
            last_name: value.last_name,
            gender: value.gender,
            birth_date: value.birth_date,
            phone: value.phone,
            email: value.email,
            relationship: value.relationship,
            status: value.status,
            baptized: value.baptized,
            baptism_date: value.baptism_date,
            profile_picture_url: value.profile_picture.as_deref().map(picture_url),
            registered_on: value.registered_on,
            notes: value.notes,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// DTO per creare un nuovo membro (senza member_id)
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateMemberDTO {
    // ignorato quando il membro viene creato insieme alla famiglia
    pub family_id: Option<i64>,
    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters"))]
    pub last_name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub relationship: Option<FamilyRelationship>,
    pub status: Option<MemberStatus>,
    pub baptized: Option<bool>,
    pub baptism_date: Option<NaiveDate>,
    pub registered_on: Option<NaiveDate>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// DTO per aggiornare un membro (solo campi modificabili).
/// La famiglia si cambia con [`AssignFamilyDTO`], la foto con l'endpoint di upload.
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateMemberDTO {
    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters"))]
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub relationship: Option<FamilyRelationship>,
    pub status: Option<MemberStatus>,
    pub baptized: Option<bool>,
    pub baptism_date: Option<NaiveDate>,
    pub registered_on: Option<NaiveDate>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// DTO per spostare un membro in un'altra famiglia (drag-and-drop).
/// `family_id` è obbligatorio: `null` stacca il membro dalla famiglia attuale,
/// la chiave assente resta `None` e viene rifiutata dal service.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AssignFamilyDTO {
    #[serde(default, deserialize_with = "present_or_null")]
    pub family_id: Option<Option<i64>>,
    pub relationship: Option<FamilyRelationship>,
}

/// Distingue la chiave presente (anche `null`) dalla chiave assente
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
