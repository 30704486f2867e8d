use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Issued exactly once per participant and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Certificate {
    pub id: Uuid,
    pub participant_id: Uuid,
    pub event_id: Uuid,
    pub template_id: Uuid,
    /// Human-readable unique number printed on the artifact.
    pub certificate_number: String,
    /// Independent lookup code for out-of-session verification.
    pub verification_code: String,
    /// Opaque URL returned by the external renderer.
    pub artifact_url: Option<String>,
    pub issued_at: DateTime<Utc>,
}
