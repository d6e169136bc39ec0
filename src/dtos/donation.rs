//! Donation DTOs - Data Transfer Objects per offerte

use crate::entities::{Donation, DonationType, PaymentMethod};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DonationDTO {
    pub donation_id: i64,
    pub member_id: Option<i64>,
    pub family_id: Option<i64>,
    pub amount: i64,
    pub donation_type: DonationType,
    pub payment_method: PaymentMethod,
    pub donated_on: NaiveDate,
    pub note: Option<String>,
    pub recorded_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<Donation> for DonationDTO {
    fn from(value: Donation) -> Self {
        Self {
            donation_id: value.donation_id,
            member_id: value.member_id,
            family_id: value.family_id,
            amount: value.amount,
            donation_type: value.donation_type,
            payment_method: value.payment_method,
            donated_on: value.donated_on,
            note: value.note,
            recorded_by: value.recorded_by,
            created_at: value.created_at,
        }
    }
}

/// DTO per registrare una nuova offerta.
/// `recorded_by` viene impostato dal service con lo staff autenticato.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateDonationDTO {
    pub member_id: Option<i64>,
    pub family_id: Option<i64>,
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,
    pub donation_type: DonationType,
    pub payment_method: Option<PaymentMethod>,
    pub donated_on: NaiveDate,
    #[validate(length(max = 500))]
    pub note: Option<String>,
    #[serde(skip_deserializing)]
    pub recorded_by: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateDonationDTO {
    pub member_id: Option<i64>,
    pub family_id: Option<i64>,
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: Option<i64>,
    pub donation_type: Option<DonationType>,
    pub payment_method: Option<PaymentMethod>,
    pub donated_on: Option<NaiveDate>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Totale per tipo di offerta
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct DonationTypeTotalDTO {
    pub donation_type: DonationType,
    pub total_amount: i64,
    pub donation_count: i64,
}

/// Riepilogo delle offerte che rispettano i filtri
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DonationSummaryDTO {
    pub total_amount: i64,
    pub donation_count: i64,
    pub by_type: Vec<DonationTypeTotalDTO>,
}

impl DonationSummaryDTO {
    /// Costruisce il riepilogo dai totali per tipo
    pub fn from_totals(by_type: Vec<DonationTypeTotalDTO>) -> Self {
        Self {
            total_amount: by_type.iter().map(|t| t.total_amount).sum(),
            donation_count: by_type.iter().map(|t| t.donation_count).sum(),
            by_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_from_totals() {
        let summary = DonationSummaryDTO::from_totals(vec![
            DonationTypeTotalDTO {
                donation_type: DonationType::Tithe,
                total_amount: 10_000,
                donation_count: 2,
            },
            DonationTypeTotalDTO {
                donation_type: DonationType::Mission,
                total_amount: 2_500,
                donation_count: 1,
            },
        ]);
        assert_eq!(summary.total_amount, 12_500);
        assert_eq!(summary.donation_count, 3);
        assert_eq!(summary.by_type.len(), 2);
    }

    #[test]
    fn empty_summary() {
        let summary = DonationSummaryDTO::from_totals(Vec::new());
        assert_eq!(summary.total_amount, 0);
        assert_eq!(summary.donation_count, 0);
    }

    #[test]
    fn amount_must_be_positive() {
        let dto = CreateDonationDTO {
            member_id: None,
            family_id: None,
            amount: 0,
            donation_type: DonationType::Offering,
            payment_method: None,
            donated_on: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            note: None,
            recorded_by: None,
        };
        assert!(dto.validate().is_err());
    }
}
