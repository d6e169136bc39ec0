//! Department DTOs - Data Transfer Objects per reparti e team

use crate::entities::{Department, Team, TeamRole};
use crate::storage::picture_url;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DepartmentDTO {
    pub department_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub leader_member_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<Department> for DepartmentDTO {
    fn from(value: Department) -> Self {
        Self {
            department_id: value.department_id,
            name: value.name,
            description: value.description,
            leader_member_id: value.leader_member_id,
            created_at: value.created_at,
        }
    }
}

/// Reparto con i suoi team
#[derive(Serialize, Deserialize, Debug)]
pub struct DepartmentDetailDTO {
    #[serde(flatten)]
    pub department: DepartmentDTO,
    pub teams: Vec<TeamDTO>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateDepartmentDTO {
    #[validate(length(min = 1, max = 100, message = "Department name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub leader_member_id: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateDepartmentDTO {
    #[validate(length(min = 1, max = 100, message = "Department name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub leader_member_id: Option<i64>,
}

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TeamDTO {
    pub team_id: i64,
    pub department_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub leader_member_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<Team> for TeamDTO {
    fn from(value: Team) -> Self {
        Self {
            team_id: value.team_id,
            department_id: value.department_id,
            name: value.name,
            description: value.description,
            leader_member_id: value.leader_member_id,
            created_at: value.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateTeamDTO {
    pub department_id: i64,
    #[validate(length(min = 1, max = 100, message = "Team name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub leader_member_id: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateTeamDTO {
    pub department_id: Option<i64>,
    #[validate(length(min = 1, max = 100, message = "Team name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub leader_member_id: Option<i64>,
}

/// Membro di un team con il suo ruolo (lista membri del team).
/// Letto direttamente con una JOIN members/team_members.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct TeamMemberDTO {
    pub team_id: i64,
    pub member_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub profile_picture: Option<String>,
    #[sqlx(skip)]
    pub profile_picture_url: Option<String>,
}

impl TeamMemberDTO {
    /// Popola la URL pubblica a partire dal nome del file
    pub fn with_picture_url(mut self) -> Self {
        self.profile_picture_url = self.profile_picture.as_deref().map(picture_url);
        self
    }
}

/// Team di cui fa parte un membro, con il nome del reparto
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct MemberTeamDTO {
    pub team_id: i64,
    pub team_name: String,
    pub department_id: i64,
    pub department_name: String,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AddTeamMemberDTO {
    pub member_id: i64,
    pub role: Option<TeamRole>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateTeamMemberDTO {
    pub role: TeamRole,
}

/// Spostamento di un membro da un team all'altro (drag-and-drop)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MoveTeamMemberDTO {
    pub target_team_id: i64,
}
