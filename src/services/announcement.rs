//! Announcement services - Bacheca avvisi

use crate::core::{AppError, AppState};
use crate::dtos::{
    AnnouncementDTO, AnnouncementQuery, CreateAnnouncementDTO, UpdateAnnouncementDTO,
};
use crate::entities::Staff;
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

#[instrument(skip(state))]
pub async fn list_announcements(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnnouncementQuery>,
) -> Result<Json<Vec<AnnouncementDTO>>, AppError> {
    debug!("Listing announcements");
    let visible_at = (!params.include_expired).then(Utc::now);
    let announcements = state.announcement.list(visible_at).await?;
    Ok(Json(
        announcements
            .into_iter()
            .map(AnnouncementDTO::from)
            .collect(),
    ))
}

#[instrument(skip(state), fields(announcement_id = %announcement_id))]
pub async fn get_announcement(
    State(state): State<Arc<AppState>>,
    Path(announcement_id): Path<i64>,
) -> Result<Json<AnnouncementDTO>, AppError> {
    let announcement = state
        .announcement
        .read(&announcement_id)
        .await?
        .ok_or_else(|| AppError::not_found("Announcement not found"))?;
    Ok(Json(AnnouncementDTO::from(announcement)))
}

#[instrument(skip(state, current_staff, body), fields(staff_id = %current_staff.staff_id, title = %body.title))]
pub async fn create_announcement(
    State(state): State<Arc<AppState>>,
    Extension(current_staff): Extension<Staff>,
    Json(mut body): Json<CreateAnnouncementDTO>,
) -> Result<(StatusCode, Json<AnnouncementDTO>), AppError> {
    body.validate()?;
    body.author_id = Some(current_staff.staff_id);

    let announcement = state.announcement.create(&body).await?;
    info!("Announcement {} published", announcement.announcement_id);
    Ok((StatusCode::CREATED, Json(AnnouncementDTO::from(announcement))))
}

#[instrument(skip(state, body), fields(announcement_id = %announcement_id))]
pub async fn update_announcement(
    State(state): State<Arc<AppState>>,
    Path(announcement_id): Path<i64>,
    Json(body): Json<UpdateAnnouncementDTO>,
) -> Result<Json<AnnouncementDTO>, AppError> {
    body.validate()?;
    let announcement = state
        .announcement
        .update(&announcement_id, &body)
        .await
        .map_err(|e| AppError::from_db(e, "Announcement not found"))?;
    Ok(Json(AnnouncementDTO::from(announcement)))
}

#[instrument(skip(state), fields(announcement_id = %announcement_id))]
pub async fn delete_announcement(
    State(state): State<Arc<AppState>>,
    Path(announcement_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .announcement
        .delete(&announcement_id)
        .await
        .map_err(|e| AppError::from_db(e, "Announcement not found"))?;
    Ok(StatusCode::NO_CONTENT)
}
