use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Event;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Participant {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    /// Fixed-format 10-digit attendance credential, unique within the event.
    pub token_number: String,
    pub has_attended: bool,
    pub attended_at: Option<DateTime<Utc>>,
    pub certificate_id: Option<Uuid>,
    pub registered_at: DateTime<Utc>,
}

/// Read-time attendance projection. `Missed` is derived by comparing the
/// clock to the event end, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Registered,
    Attended,
    Missed,
}

impl Participant {
    pub fn attendance_status(&self, event: &Event, now: DateTime<Utc>) -> AttendanceStatus {
        if self.has_attended {
            AttendanceStatus::Attended
        } else if now > event.effective_end() {
            AttendanceStatus::Missed
        } else {
            AttendanceStatus::Registered
        }
    }
}

/// Verified identity attributes supplied by the auth collaborator.
/// The lifecycle core never authenticates; it trusts these as given.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixture() -> (Event, Participant) {
        let start = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
        let event = Event {
            id: Uuid::new_v4(),
            name: "Conference".to_string(),
            description: None,
            location: None,
            category: None,
            starts_at: start,
            ends_at: Some(start + chrono::Duration::hours(8)),
            registration_deadline: None,
            max_participants: None,
            current_participants: 1,
            created_at: start,
            updated_at: start,
        };
        let participant = Participant {
            id: Uuid::new_v4(),
            event_id: event.id,
            user_id: Uuid::new_v4(),
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            token_number: "0123456789".to_string(),
            has_attended: false,
            attended_at: None,
            certificate_id: None,
            registered_at: start - chrono::Duration::days(3),
        };
        (event, participant)
    }

    #[test]
    fn missed_is_derived_after_event_end() {
        let (event, participant) = fixture();
        let end = event.ends_at.unwrap();

        assert_eq!(
            participant.attendance_status(&event, end),
            AttendanceStatus::Registered
        );
        assert_eq!(
            participant.attendance_status(&event, end + chrono::Duration::minutes(1)),
            AttendanceStatus::Missed
        );
    }

    #[test]
    fn attended_wins_over_missed() {
        let (event, mut participant) = fixture();
        participant.has_attended = true;

        let long_after = event.effective_end() + chrono::Duration::days(30);
        assert_eq!(
            participant.attendance_status(&event, long_after),
            AttendanceStatus::Attended
        );
    }
}
