use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::db::Database;
use crate::models::event::{NewEvent, UpdateEvent};
use crate::models::Event;
use crate::utils::error::AppError;

impl Database {
    pub async fn create_event(&self, new: NewEvent, now: DateTime<Utc>) -> Result<Event, AppError> {
        if new.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Event name must not be empty".to_string(),
            ));
        }
        if let Some(max) = new.max_participants {
            if max <= 0 {
                return Err(AppError::ValidationError(
                    "max_participants must be positive".to_string(),
                ));
            }
        }

        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO events (id, name, description, location, category, starts_at, ends_at, \
             registration_deadline, max_participants, current_participants, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.location)
        .bind(&new.category)
        .bind(new.starts_at)
        .bind(new.ends_at)
        .bind(new.registration_deadline)
        .bind(new.max_participants)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_event(id).await
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {id}")))
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY starts_at")
            .fetch_all(self.pool())
            .await?;
        Ok(events)
    }

    /// Applies an admin edit. Once registrations exist the start instant is
    /// frozen and capacity may not drop below the participants already in.
    pub async fn update_event(
        &self,
        id: Uuid,
        update: UpdateEvent,
        now: DateTime<Utc>,
    ) -> Result<Event, AppError> {
        let current = self.get_event(id).await?;

        if current.current_participants > 0 {
            if let Some(starts_at) = update.starts_at {
                if starts_at != current.starts_at {
                    return Err(AppError::ValidationError(
                        "Event start cannot change after participants have registered".to_string(),
                    ));
                }
            }
            if let Some(max) = update.max_participants {
                if max < current.current_participants {
                    return Err(AppError::ValidationError(format!(
                        "Capacity {max} is below the {} participants already registered",
                        current.current_participants
                    )));
                }
            }
        }

        let name = update.name.unwrap_or(current.name);
        let description = update.description.or(current.description);
        let location = update.location.or(current.location);
        let category = update.category.or(current.category);
        let starts_at = update.starts_at.unwrap_or(current.starts_at);
        let ends_at = update.ends_at.or(current.ends_at);
        let registration_deadline = update
            .registration_deadline
            .or(current.registration_deadline);
        let max_participants = update.max_participants.or(current.max_participants);

        sqlx::query(
            "UPDATE events SET name = ?, description = ?, location = ?, category = ?, \
             starts_at = ?, ends_at = ?, registration_deadline = ?, max_participants = ?, \
             updated_at = ? WHERE id = ?",
        )
        .bind(&name)
        .bind(&description)
        .bind(&location)
        .bind(&category)
        .bind(starts_at)
        .bind(ends_at)
        .bind(registration_deadline)
        .bind(max_participants)
        .bind(now)
        .bind(id)
        .execute(self.pool())
        .await?;

        self.get_event(id).await
    }

    pub async fn delete_event(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Conditional increment: the capacity check and the count bump are one
    /// statement, so two racing registrations cannot both take the last slot.
    /// Returns false when the event is full.
    pub async fn try_claim_slot(&self, event_id: Uuid, now: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE events SET current_participants = current_participants + 1, updated_at = ? \
             WHERE id = ? AND (max_participants IS NULL OR current_participants < max_participants)",
        )
        .bind(now)
        .bind(event_id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Rolls back a claimed slot when the registration insert did not land.
    pub async fn release_slot(&self, event_id: Uuid, now: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE events SET current_participants = current_participants - 1, updated_at = ? \
             WHERE id = ? AND current_participants > 0",
        )
        .bind(now)
        .bind(event_id)
        .execute(self.pool())
        .await?;
        Ok(())
    }
}
