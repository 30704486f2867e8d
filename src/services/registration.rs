use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::warn;
use uuid::Uuid;

use crate::external::Notifier;
use crate::models::{Event, Identity, Participant};
use crate::storage::{Database, InsertOutcome};
use crate::utils::error::AppError;

/// Attendance tokens are 10-digit zero-padded numerics. The space is large
/// enough that a collision inside one event's participant set is negligible;
/// when one does happen we regenerate instead of failing the registration.
const TOKEN_DIGITS: u32 = 10;
const MAX_TOKEN_ATTEMPTS: usize = 8;

fn mint_token() -> String {
    let upper = 10u64.pow(TOKEN_DIGITS);
    let n = rand::thread_rng().gen_range(0..upper);
    format!("{n:0width$}", width = TOKEN_DIGITS as usize)
}

#[derive(Clone)]
pub struct RegistrationService {
    db: Database,
    notifier: Arc<dyn Notifier>,
}

impl RegistrationService {
    pub fn new(db: Database, notifier: Arc<dyn Notifier>) -> Self {
        Self { db, notifier }
    }

    /// Registers a verified identity for an event and issues its attendance
    /// token. The capacity check-and-claim is a single conditional update, so
    /// racing registrations near capacity cannot oversubscribe the event.
    pub async fn register(
        &self,
        event_id: Uuid,
        identity: Identity,
        now: DateTime<Utc>,
    ) -> Result<Participant, AppError> {
        let event = self.db.get_event(event_id).await?;

        if self
            .db
            .find_registration(event_id, identity.user_id)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyRegistered);
        }

        if !registration_window_open(&event, now) {
            return Err(AppError::RegistrationClosed);
        }

        if !self.db.try_claim_slot(event_id, now).await? {
            return Err(AppError::EventFull);
        }

        match self.insert_with_fresh_token(&event, &identity, now).await {
            Ok(participant) => {
                self.notify(&participant, &event);
                Ok(participant)
            }
            Err(e) => {
                self.db.release_slot(event_id, now).await?;
                Err(e)
            }
        }
    }

    async fn insert_with_fresh_token(
        &self,
        event: &Event,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<Participant, AppError> {
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let participant = Participant {
                id: Uuid::new_v4(),
                event_id: event.id,
                user_id: identity.user_id,
                full_name: identity.full_name.clone(),
                email: identity.email.clone(),
                token_number: mint_token(),
                has_attended: false,
                attended_at: None,
                certificate_id: None,
                registered_at: now,
            };

            match self.db.insert_participant(&participant).await? {
                InsertOutcome::Inserted => return Ok(participant),
                InsertOutcome::Conflict => {
                    // Either the user raced a second registration in, or the
                    // token collided. Only the latter is retryable.
                    if self
                        .db
                        .find_registration(event.id, identity.user_id)
                        .await?
                        .is_some()
                    {
                        return Err(AppError::AlreadyRegistered);
                    }
                }
            }
        }

        Err(AppError::Internal(format!(
            "could not mint a unique token after {MAX_TOKEN_ATTEMPTS} attempts"
        )))
    }

    /// Token delivery is fire-and-forget; a failed send is logged and never
    /// rolls back the registration.
    fn notify(&self, participant: &Participant, event: &Event) {
        let notifier = self.notifier.clone();
        let participant = participant.clone();
        let event = event.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.token_issued(&participant, &event).await {
                warn!(participant = %participant.id, error = %e, "Token delivery failed");
            }
        });
    }
}

/// Time half of `can_register`; the capacity half is settled atomically by
/// the slot claim.
fn registration_window_open(event: &Event, now: DateTime<Utc>) -> bool {
    if now >= event.starts_at {
        return false;
    }
    match event.registration_deadline {
        Some(deadline) => now < deadline,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_fixed_width_numeric() {
        for _ in 0..100 {
            let token = mint_token();
            assert_eq!(token.len(), 10);
            assert!(token.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
