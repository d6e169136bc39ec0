//! Member entity - Entità membro della chiesa

use super::enums::{FamilyRelationship, Gender, MemberStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Member {
    pub member_id: i64,
    // None = membro non assegnato a nessuna famiglia
    pub family_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    // ruolo all'interno della famiglia (capofamiglia, coniuge, ...)
    pub relationship: Option<FamilyRelationship>,
    pub status: MemberStatus,
    pub baptized: bool,
    pub baptism_date: Option<NaiveDate>,
    // nome del file salvato nella upload dir, mai il nome originale del client
    pub profile_picture: Option<String>,
    pub registered_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
