use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::handlers::events::ParticipantView;
use crate::models::{Certificate, Identity};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

/// Registers the verified identity for an event and issues the attendance
/// token. The token rides back in the response and is also handed to the
/// notifier for out-of-band delivery.
pub async fn register(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(identity): Json<Identity>,
) -> Result<Response, AppError> {
    let participant = state
        .registration
        .register(event_id, identity, Utc::now())
        .await?;
    Ok(created(participant, "Registration confirmed"))
}

#[derive(Deserialize)]
pub struct RegistrationQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct RegistrationView {
    #[serde(flatten)]
    pub participant: ParticipantView,
    pub certificate: Option<Certificate>,
}

/// "My registration" read for the participant-facing surface.
pub async fn my_registration(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<RegistrationQuery>,
) -> Result<Response, AppError> {
    let event = state.db.get_event(event_id).await?;
    let participant = state
        .db
        .find_registration(event_id, query.user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No registration for user {} on this event",
                query.user_id
            ))
        })?;

    let certificate = state
        .db
        .find_certificate_for_participant(participant.id)
        .await?;

    let view = RegistrationView {
        participant: ParticipantView {
            status: participant.attendance_status(&event, Utc::now()),
            participant,
        },
        certificate,
    };
    Ok(success(view, "Registration retrieved"))
}
