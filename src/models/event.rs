use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub registration_deadline: Option<DateTime<Utc>>,
    /// `None` means unlimited capacity.
    pub max_participants: Option<i64>,
    pub current_participants: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Registration is open strictly before the event starts, before the
    /// deadline when one is set, and while capacity remains.
    pub fn can_register(&self, now: DateTime<Utc>) -> bool {
        if now >= self.starts_at {
            return false;
        }
        if let Some(deadline) = self.registration_deadline {
            if now >= deadline {
                return false;
            }
        }
        match self.max_participants {
            Some(max) => self.current_participants < max,
            None => true,
        }
    }

    /// Moment past which an unattended registration counts as missed.
    /// Events without an explicit end fall back to their start instant.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.ends_at.unwrap_or(self.starts_at)
    }
}

#[derive(Debug, Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub max_participants: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEvent {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub max_participants: Option<i64>,
}
