//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Questo modulo organizza i service handlers in sotto-moduli separati per una migliore manutenibilità.
//! Ogni modulo gestisce gli endpoint HTTP per una specifica funzionalità.

pub mod announcement;
pub mod auth;
pub mod department;
pub mod donation;
pub mod event;
pub mod family;
pub mod member;
pub mod staff;
pub mod team;

// Re-exports per facilitare l'import
pub use announcement::{
    create_announcement, delete_announcement, get_announcement, list_announcements,
    update_announcement,
};
pub use auth::{bootstrap_admin, login, logout, me};
pub use department::{
    create_department, delete_department, get_department, list_departments, update_department,
};
pub use donation::{
    create_donation, delete_donation, donation_summary, get_donation, list_donations,
    update_donation,
};
pub use event::{create_event, delete_event, get_event, list_events, update_event};
pub use family::{create_family, delete_family, get_family, list_families, update_family};
pub use member::{
    assign_family, create_member, delete_member, delete_member_picture, get_member,
    list_member_teams, list_members, update_member, upload_member_picture,
};
pub use staff::{create_staff, delete_staff, get_staff, list_staff, update_staff, upload_staff_picture};
pub use team::{
    add_team_member, create_team, delete_team, get_team, list_team_members, list_teams,
    move_team_member, remove_team_member, update_team, update_team_member,
};

use crate::core::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}
