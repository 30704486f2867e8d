use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::event::{NewEvent, UpdateEvent};
use crate::models::{AttendanceStatus, Participant};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

pub async fn create_event(
    State(state): State<AppState>,
    Json(new): Json<NewEvent>,
) -> Result<Response, AppError> {
    let event = state.db.create_event(new, Utc::now()).await?;
    Ok(created(event, "Event created"))
}

pub async fn list_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let events = state.db.list_events().await?;
    Ok(success(events, "Events retrieved"))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = state.db.get_event(id).await?;
    Ok(success(event, "Event retrieved"))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateEvent>,
) -> Result<Response, AppError> {
    let event = state.db.update_event(id, update, Utc::now()).await?;
    Ok(success(event, "Event updated"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    if !state.db.delete_event(id).await? {
        return Err(AppError::NotFound(format!("Event {id}")));
    }
    Ok(empty_success("Event deleted"))
}

#[derive(Deserialize)]
pub struct ParticipantFilter {
    pub attended: Option<bool>,
    pub certificate: Option<bool>,
}

/// Participant plus the read-time attendance projection.
#[derive(Serialize)]
pub struct ParticipantView {
    #[serde(flatten)]
    pub participant: Participant,
    pub status: AttendanceStatus,
}

pub async fn list_participants(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(filter): Query<ParticipantFilter>,
) -> Result<Response, AppError> {
    let event = state.db.get_event(id).await?;
    let now = Utc::now();

    let participants = state
        .db
        .list_participants(id, filter.attended, filter.certificate)
        .await?;
    let views: Vec<ParticipantView> = participants
        .into_iter()
        .map(|participant| ParticipantView {
            status: participant.attendance_status(&event, now),
            participant,
        })
        .collect();

    Ok(success(views, "Participants retrieved"))
}
