use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::config::WindowClose;
use crate::models::{Event, Participant};
use crate::storage::Database;
use crate::utils::error::AppError;

/// Time-gated token verifier. The only transition it performs is
/// `Registered -> Attended`, exactly once per participant.
#[derive(Clone)]
pub struct AttendanceGate {
    db: Database,
    close_policy: WindowClose,
}

impl AttendanceGate {
    pub fn new(db: Database, close_policy: WindowClose) -> Self {
        Self { db, close_policy }
    }

    /// The window opens at event start. Whether it ever closes again is a
    /// deployment decision; under `EventEnd` it closes at `ends_at` for
    /// events that declare one.
    pub fn window_open(&self, event: &Event, now: DateTime<Utc>) -> bool {
        if now < event.starts_at {
            return false;
        }
        match (self.close_policy, event.ends_at) {
            (WindowClose::EventEnd, Some(end)) => now <= end,
            _ => true,
        }
    }

    /// Redeems an attendance token. Checks run in a fixed order: window,
    /// prior redemption, token match. The final write re-checks prior
    /// redemption atomically, so concurrent calls settle to one success.
    pub async fn redeem(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        submitted_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Participant, AppError> {
        let event = self.db.get_event(event_id).await?;

        if !self.window_open(&event, now) {
            return Err(AppError::AttendanceWindowClosed);
        }

        let participant = self
            .db
            .find_registration(event_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No registration for user {user_id} on this event"))
            })?;

        if participant.has_attended {
            return Err(AppError::AlreadyAttended);
        }

        // Exact match after trimming surrounding whitespace; no other
        // normalization.
        if submitted_token.trim() != participant.token_number {
            return Err(AppError::InvalidToken);
        }

        if !self.db.mark_attended(participant.id, now).await? {
            // Lost the race to another redemption.
            return Err(AppError::AlreadyAttended);
        }

        info!(participant = %participant.id, event = %event_id, "Attendance recorded");
        self.db.get_participant(participant.id).await
    }
}
