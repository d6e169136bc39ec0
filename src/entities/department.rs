//! Department entity - Entità reparto (ministero)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Department {
    pub department_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub leader_member_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
