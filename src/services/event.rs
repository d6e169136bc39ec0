//! Event services - Calendario eventi

use crate::core::{AppError, AppState};
use crate::dtos::event::is_valid_range;
use crate::dtos::{CreateEventDTO, EventDTO, EventQuery, UpdateEventDTO};
use crate::entities::Staff;
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

async fn ensure_department_exists(
    state: &AppState,
    department_id: Option<i64>,
) -> Result<(), AppError> {
    if let Some(department_id) = department_id {
        if !state.department.exists(&department_id).await? {
            return Err(AppError::not_found("Department not found"));
        }
    }
    Ok(())
}

fn invalid_range() -> AppError {
    warn!("Event ends before it starts");
    AppError::bad_request("Invalid date range").with_details("ends_at is before starts_at")
}

#[instrument(skip(state))]
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventQuery>,
) -> Result<Json<Vec<EventDTO>>, AppError> {
    debug!("Listing events");
    let events = state.event.list(&params).await?;
    Ok(Json(events.into_iter().map(EventDTO::from).collect()))
}

#[instrument(skip(state), fields(event_id = %event_id))]
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> Result<Json<EventDTO>, AppError> {
    let event = state
        .event
        .read(&event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;
    Ok(Json(EventDTO::from(event)))
}

#[instrument(skip(state, current_staff, body), fields(staff_id = %current_staff.staff_id, title = %body.title))]
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Extension(current_staff): Extension<Staff>,
    Json(mut body): Json<CreateEventDTO>,
) -> Result<(StatusCode, Json<EventDTO>), AppError> {
    body.validate()?;
    if !is_valid_range(body.starts_at, body.ends_at) {
        return Err(invalid_range());
    }
    ensure_department_exists(&state, body.department_id).await?;

    body.created_by = Some(current_staff.staff_id);
    let event = state.event.create(&body).await?;

    info!("Event {} created", event.event_id);
    Ok((StatusCode::CREATED, Json(EventDTO::from(event))))
}

#[instrument(skip(state, body), fields(event_id = %event_id))]
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
    Json(body): Json<UpdateEventDTO>,
) -> Result<Json<EventDTO>, AppError> {
    body.validate()?;

    // l'intervallo va controllato sui valori finali, non solo su quelli inviati
    let current = state
        .event
        .read(&event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;
    let starts_at = body.starts_at.unwrap_or(current.starts_at);
    let ends_at = body.ends_at.or(current.ends_at);
    if !is_valid_range(starts_at, ends_at) {
        return Err(invalid_range());
    }
    ensure_department_exists(&state, body.department_id).await?;

    let event = state
        .event
        .update(&event_id, &body)
        .await
        .map_err(|e| AppError::from_db(e, "Event not found"))?;
    Ok(Json(EventDTO::from(event)))
}

#[instrument(skip(state), fields(event_id = %event_id))]
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .event
        .delete(&event_id)
        .await
        .map_err(|e| AppError::from_db(e, "Event not found"))?;
    Ok(StatusCode::NO_CONTENT)
}
