//! Query DTOs - Data Transfer Objects per i filtri delle liste

use crate::entities::{DonationType, FamilyStatus, MemberStatus, PaymentMethod};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Filtri per `GET /api/families`
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct FamilyQuery {
    pub search: Option<String>,
    pub status: Option<FamilyStatus>,
}

/// Filtri per `GET /api/members`
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct MemberQuery {
    pub search: Option<String>,
    pub status: Option<MemberStatus>,
    pub family_id: Option<i64>,
    /// Solo membri senza famiglia
    pub unassigned: Option<bool>,
}

/// Filtri per `GET /api/teams`
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct TeamQuery {
    pub department_id: Option<i64>,
}

/// Filtri per `GET /api/donations` e `GET /api/donations/summary`.
/// `from` e `to` sono inclusivi.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct DonationQuery {
    pub member_id: Option<i64>,
    pub family_id: Option<i64>,
    pub donation_type: Option<DonationType>,
    pub payment_method: Option<PaymentMethod>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Filtri per `GET /api/events`, applicati a `starts_at`
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct EventQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub department_id: Option<i64>,
}

/// Filtri per `GET /api/announcements`
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct AnnouncementQuery {
    #[serde(default)]
    pub include_expired: bool,
}

/// Pattern LIKE per la ricerca testuale; None se la ricerca è vuota
pub fn like_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s))
}
