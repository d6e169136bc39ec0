//! Event DTOs - Data Transfer Objects per eventi

use crate::entities::Event;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EventDTO {
    pub event_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub department_id: Option<i64>,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventDTO {
    fn from(value: Event) -> Self {
        Self {
            event_id: value.event_id,
            title: value.title,
            description: value.description,
            location: value.location,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            department_id: value.department_id,
            created_by: value.created_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateEventDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub department_id: Option<i64>,
    #[serde(skip_deserializing)]
    pub created_by: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateEventDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub department_id: Option<i64>,
}

/// Un evento non può finire prima di iniziare
pub fn is_valid_range(starts_at: DateTime<Utc>, ends_at: Option<DateTime<Utc>>) -> bool {
    ends_at.is_none_or(|ends_at| ends_at >= starts_at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn range_validation() {
        let start = Utc::now();
        assert!(is_valid_range(start, None));
        assert!(is_valid_range(start, Some(start)));
        assert!(is_valid_range(start, Some(start + Duration::hours(2))));
        assert!(!is_valid_range(start, Some(start - Duration::minutes(1))));
    }
}
