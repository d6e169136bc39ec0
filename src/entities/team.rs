//! Team entity - Entità team e appartenenza membro-team

use super::enums::TeamRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Team {
    pub team_id: i64,
    pub department_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub leader_member_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct TeamMembership {
    pub team_id: i64,
    pub member_id: i64,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
}
