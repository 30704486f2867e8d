use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::{is_unique_violation, Database};
use crate::models::Participant;
use crate::utils::error::AppError;

/// Result of an insert guarded by a unique index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A unique index rejected the row; the caller decides which conflict
    /// it was.
    Conflict,
}

impl Database {
    pub async fn insert_participant(
        &self,
        participant: &Participant,
    ) -> Result<InsertOutcome, AppError> {
        let result = sqlx::query(
            "INSERT INTO participants (id, event_id, user_id, full_name, email, token_number, \
             has_attended, attended_at, certificate_id, registered_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(participant.id)
        .bind(participant.event_id)
        .bind(participant.user_id)
        .bind(&participant.full_name)
        .bind(&participant.email)
        .bind(&participant.token_number)
        .bind(participant.has_attended)
        .bind(participant.attended_at)
        .bind(participant.certificate_id)
        .bind(participant.registered_at)
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_participant(&self, id: Uuid) -> Result<Participant, AppError> {
        sqlx::query_as::<_, Participant>("SELECT * FROM participants WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Participant {id}")))
    }

    pub async fn find_registration(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Participant>, AppError> {
        let participant = sqlx::query_as::<_, Participant>(
            "SELECT * FROM participants WHERE event_id = ? AND user_id = ?",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(participant)
    }

    /// Participant list for the admin surface, optionally filtered by
    /// attendance and by certificate presence.
    pub async fn list_participants(
        &self,
        event_id: Uuid,
        attended: Option<bool>,
        has_certificate: Option<bool>,
    ) -> Result<Vec<Participant>, AppError> {
        let mut sql = String::from("SELECT * FROM participants WHERE event_id = ?");
        if attended.is_some() {
            sql.push_str(" AND has_attended = ?");
        }
        match has_certificate {
            Some(true) => sql.push_str(" AND certificate_id IS NOT NULL"),
            Some(false) => sql.push_str(" AND certificate_id IS NULL"),
            None => {}
        }
        sql.push_str(" ORDER BY registered_at");

        let mut query = sqlx::query_as::<_, Participant>(&sql).bind(event_id);
        if let Some(attended) = attended {
            query = query.bind(attended);
        }

        let participants = query.fetch_all(self.pool()).await?;
        Ok(participants)
    }

    /// One-way flip of `has_attended`. The predicate in the WHERE clause makes
    /// the check-and-set atomic; exactly one of any number of racing calls
    /// sees a row change. Returns false when attendance was already recorded.
    pub async fn mark_attended(
        &self,
        participant_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE participants SET has_attended = 1, attended_at = ? \
             WHERE id = ? AND has_attended = 0",
        )
        .bind(now)
        .bind(participant_id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_certificate_id(
        &self,
        participant_id: Uuid,
        certificate_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE participants SET certificate_id = ? WHERE id = ?")
            .bind(certificate_id)
            .bind(participant_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
