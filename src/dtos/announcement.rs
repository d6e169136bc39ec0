//! Announcement DTOs - Data Transfer Objects per avvisi

use crate::entities::Announcement;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Struct per gestire io col client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AnnouncementDTO {
    pub announcement_id: i64,
    pub title: String,
    pub content: String,
    pub author_id: Option<i64>,
    pub is_pinned: bool,
    pub published_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl From<Announcement> for AnnouncementDTO {
    fn from(value: Announcement) -> Self {
        Self {
            announcement_id: value.announcement_id,
            title: value.title,
            content: value.content,
            author_id: value.author_id,
            is_pinned: value.is_pinned,
            published_at: value.published_at,
            expires_at: value.expires_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateAnnouncementDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 10000, message = "Content must be between 1 and 10000 characters"))]
    pub content: String,
    pub is_pinned: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_deserializing)]
    pub author_id: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
pub struct UpdateAnnouncementDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 10000, message = "Content must be between 1 and 10000 characters"))]
    pub content: Option<String>,
    pub is_pinned: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}
