//! Donation entity - Entità offerta

use super::enums::{DonationType, PaymentMethod};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Donation {
    pub donation_id: i64,
    pub member_id: Option<i64>,
    pub family_id: Option<i64>,
    // importo in unità minime della valuta (centesimi)
    pub amount: i64,
    pub donation_type: DonationType,
    pub payment_method: PaymentMethod,
    pub donated_on: NaiveDate,
    pub note: Option<String>,
    // staff che ha registrato l'offerta
    pub recorded_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}
