//! Seams to the collaborators outside the lifecycle core: token delivery and
//! certificate rendering. Both are trait objects so tests can substitute them
//! and neither can leak logic back into the services.

use async_trait::async_trait;
use tracing::info;

use crate::models::{CertificateTemplate, Event, Participant};
use crate::utils::error::AppError;

/// Delivers the attendance token out-of-band after registration.
/// Invoked fire-and-forget; a delivery failure never rolls back anything.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn token_issued(&self, participant: &Participant, event: &Event)
        -> Result<(), AppError>;
}

/// Default notifier: records the delivery intent in the log. A real mail
/// transport plugs in behind the same trait.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn token_issued(
        &self,
        participant: &Participant,
        event: &Event,
    ) -> Result<(), AppError> {
        info!(
            participant = %participant.id,
            email = %participant.email,
            event = %event.name,
            "Attendance token ready for delivery"
        );
        Ok(())
    }
}

/// One resolved placeholder value, keyed by the template vocabulary.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FieldBinding {
    pub key: String,
    pub value: String,
}

/// Fully resolved input for the rendering backend: the template plus the
/// participant-specific field values. The core's responsibility ends here.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RenderJob {
    pub certificate_number: String,
    pub template: CertificateTemplate,
    pub bindings: Vec<FieldBinding>,
}

/// Produces the durable artifact (image/PDF) and returns its URL, which the
/// core stores opaquely on the certificate.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, job: &RenderJob) -> Result<String, AppError>;
}

/// Default renderer: derives a stable artifact URL without rasterizing
/// anything. Suitable for development and tests.
pub struct StaticArtifactRenderer {
    base_url: String,
}

impl StaticArtifactRenderer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Renderer for StaticArtifactRenderer {
    async fn render(&self, job: &RenderJob) -> Result<String, AppError> {
        Ok(format!(
            "{}/{}.pdf",
            self.base_url.trim_end_matches('/'),
            job.certificate_number
        ))
    }
}
