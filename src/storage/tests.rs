//! Storage layer tests against in-memory SQLite.

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use super::{Database, InsertOutcome};
use crate::models::event::NewEvent;
use crate::models::{Certificate, Participant, Placeholder, TemplateDraft, TextAlign};

async fn test_db() -> Database {
    Database::open_in_memory().await.unwrap()
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

fn new_event(max_participants: Option<i64>) -> NewEvent {
    NewEvent {
        name: "Workshop".to_string(),
        description: Some("Intro to embedded Rust".to_string()),
        location: Some("Lisbon".to_string()),
        category: Some("workshop".to_string()),
        starts_at: t0() + Duration::days(14),
        ends_at: None,
        registration_deadline: None,
        max_participants,
    }
}

fn participant_row(event_id: Uuid, token: &str) -> Participant {
    Participant {
        id: Uuid::new_v4(),
        event_id,
        user_id: Uuid::new_v4(),
        full_name: "Grace Hopper".to_string(),
        email: "grace@example.com".to_string(),
        token_number: token.to_string(),
        has_attended: false,
        attended_at: None,
        certificate_id: None,
        registered_at: t0(),
    }
}

fn draft() -> TemplateDraft {
    TemplateDraft {
        name: "Classic".to_string(),
        description: None,
        background_image: Some("bg/classic.png".to_string()),
        width: 1123.0,
        height: 794.0,
        orientation: crate::models::Orientation::Landscape,
        background_color: "#fdfdf8".to_string(),
        placeholders: vec![Placeholder {
            key: "participant_name".to_string(),
            label: "Participant".to_string(),
            x: 561.0,
            y: 380.0,
            font_size: 36.0,
            font_family: "serif".to_string(),
            color: "#1a1a1a".to_string(),
            align: TextAlign::Center,
            max_width: None,
        }],
        is_active: true,
    }
}

// === Events ===

#[tokio::test]
async fn create_and_get_event() {
    let db = test_db().await;
    let event = db.create_event(new_event(Some(30)), t0()).await.unwrap();

    let fetched = db.get_event(event.id).await.unwrap();
    assert_eq!(fetched.name, "Workshop");
    assert_eq!(fetched.max_participants, Some(30));
    assert_eq!(fetched.current_participants, 0);
}

#[tokio::test]
async fn slot_claims_stop_at_capacity() {
    let db = test_db().await;
    let event = db.create_event(new_event(Some(2)), t0()).await.unwrap();

    assert!(db.try_claim_slot(event.id, t0()).await.unwrap());
    assert!(db.try_claim_slot(event.id, t0()).await.unwrap());
    assert!(!db.try_claim_slot(event.id, t0()).await.unwrap());

    db.release_slot(event.id, t0()).await.unwrap();
    assert!(db.try_claim_slot(event.id, t0()).await.unwrap());
    assert_eq!(db.get_event(event.id).await.unwrap().current_participants, 2);
}

#[tokio::test]
async fn unlimited_events_always_have_a_slot() {
    let db = test_db().await;
    let event = db.create_event(new_event(None), t0()).await.unwrap();

    for _ in 0..50 {
        assert!(db.try_claim_slot(event.id, t0()).await.unwrap());
    }
}

// === Participants ===

#[tokio::test]
async fn duplicate_registration_and_token_are_conflicts() {
    let db = test_db().await;
    let event = db.create_event(new_event(None), t0()).await.unwrap();

    let first = participant_row(event.id, "0000000001");
    assert_eq!(
        db.insert_participant(&first).await.unwrap(),
        InsertOutcome::Inserted
    );

    // Same user again.
    let mut same_user = participant_row(event.id, "0000000002");
    same_user.user_id = first.user_id;
    assert_eq!(
        db.insert_participant(&same_user).await.unwrap(),
        InsertOutcome::Conflict
    );

    // Different user, same token.
    let same_token = participant_row(event.id, "0000000001");
    assert_eq!(
        db.insert_participant(&same_token).await.unwrap(),
        InsertOutcome::Conflict
    );
}

#[tokio::test]
async fn mark_attended_flips_once() {
    let db = test_db().await;
    let event = db.create_event(new_event(None), t0()).await.unwrap();
    let participant = participant_row(event.id, "0000000001");
    db.insert_participant(&participant).await.unwrap();

    let when = t0() + Duration::days(14);
    assert!(db.mark_attended(participant.id, when).await.unwrap());
    assert!(!db.mark_attended(participant.id, when + Duration::hours(1)).await.unwrap());

    let stored = db.get_participant(participant.id).await.unwrap();
    assert!(stored.has_attended);
    assert_eq!(stored.attended_at, Some(when));
}

#[tokio::test]
async fn participant_filters_by_attendance_and_certificate() {
    let db = test_db().await;
    let event = db.create_event(new_event(None), t0()).await.unwrap();

    let attended = participant_row(event.id, "0000000001");
    let absent = participant_row(event.id, "0000000002");
    db.insert_participant(&attended).await.unwrap();
    db.insert_participant(&absent).await.unwrap();
    db.mark_attended(attended.id, t0() + Duration::days(14))
        .await
        .unwrap();
    db.set_certificate_id(attended.id, Uuid::new_v4())
        .await
        .unwrap();

    let all = db.list_participants(event.id, None, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let went = db
        .list_participants(event.id, Some(true), None)
        .await
        .unwrap();
    assert_eq!(went.len(), 1);
    assert_eq!(went[0].id, attended.id);

    let uncertified = db
        .list_participants(event.id, None, Some(false))
        .await
        .unwrap();
    assert_eq!(uncertified.len(), 1);
    assert_eq!(uncertified[0].id, absent.id);
}

// === Templates ===

#[tokio::test]
async fn placeholders_round_trip_through_json_storage() {
    let db = test_db().await;
    let template = db.insert_template(draft(), t0()).await.unwrap();

    let fetched = db.get_template(template.id).await.unwrap();
    assert_eq!(fetched.placeholders.0, draft().placeholders);
    assert_eq!(fetched.background_image.as_deref(), Some("bg/classic.png"));
    assert!(fetched.is_default);
}

#[tokio::test]
async fn set_default_is_exclusive() {
    let db = test_db().await;
    let first = db.insert_template(draft(), t0()).await.unwrap();
    let mut other = draft();
    other.name = "Modern".to_string();
    let second = db.insert_template(other, t0()).await.unwrap();

    db.set_default_template(second.id).await.unwrap();

    assert!(!db.get_template(first.id).await.unwrap().is_default);
    assert!(db.get_template(second.id).await.unwrap().is_default);
    assert_eq!(db.default_template().await.unwrap().unwrap().id, second.id);
}

// === Certificates ===

#[tokio::test]
async fn one_certificate_per_participant() {
    let db = test_db().await;
    let event = db.create_event(new_event(None), t0()).await.unwrap();
    let participant = participant_row(event.id, "0000000001");
    db.insert_participant(&participant).await.unwrap();
    let template = db.insert_template(draft(), t0()).await.unwrap();

    let certificate = Certificate {
        id: Uuid::new_v4(),
        participant_id: participant.id,
        event_id: event.id,
        template_id: template.id,
        certificate_number: "CERT-2025-00000001".to_string(),
        verification_code: "ABCD1234EFGH".to_string(),
        artifact_url: None,
        issued_at: t0() + Duration::days(15),
    };
    assert_eq!(
        db.insert_certificate(&certificate).await.unwrap(),
        InsertOutcome::Inserted
    );

    let duplicate = Certificate {
        id: Uuid::new_v4(),
        certificate_number: "CERT-2025-00000002".to_string(),
        verification_code: "ZZZZ9999ZZZZ".to_string(),
        ..certificate.clone()
    };
    assert_eq!(
        db.insert_certificate(&duplicate).await.unwrap(),
        InsertOutcome::Conflict
    );

    let found = db
        .find_certificate_by_verification_code("ABCD1234EFGH")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, certificate.id);

    db.set_artifact_url(certificate.id, "/certificates/CERT-2025-00000001.pdf")
        .await
        .unwrap();
    let stored = db.get_certificate(certificate.id).await.unwrap();
    assert_eq!(
        stored.artifact_url.as_deref(),
        Some("/certificates/CERT-2025-00000001.pdf")
    );
}
