use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Deserialize)]
pub struct RedeemRequest {
    pub user_id: Uuid,
    pub token: String,
}

/// Redeems an attendance token inside the event's attendance window.
pub async fn redeem(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(request): Json<RedeemRequest>,
) -> Result<Response, AppError> {
    let participant = state
        .attendance
        .redeem(event_id, request.user_id, &request.token, Utc::now())
        .await?;
    Ok(success(participant, "Attendance recorded"))
}
