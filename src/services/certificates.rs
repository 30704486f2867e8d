use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::external::{FieldBinding, RenderJob, Renderer};
use crate::models::{Certificate, CertificateTemplate, Event, Participant};
use crate::storage::{Database, InsertOutcome};
use crate::utils::error::AppError;

const VERIFICATION_CODE_LEN: usize = 12;
const MAX_MINT_ATTEMPTS: usize = 8;

fn mint_certificate_number(now: DateTime<Utc>) -> String {
    let serial: u32 = rand::thread_rng().gen_range(0..100_000_000);
    format!("CERT-{}-{serial:08}", now.year())
}

fn mint_verification_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(VERIFICATION_CODE_LEN)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

/// Per-item outcome of a bulk run; one participant's failure never aborts
/// the batch.
#[derive(Debug, Clone, Serialize)]
pub struct BulkFailure {
    pub participant_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkIssueReport {
    pub generated: usize,
    pub failures: Vec<BulkFailure>,
}

/// Derives certificate eligibility and drives issuance. Rasterization is the
/// renderer's problem; this engine stops at a resolved template plus field
/// bindings and an opaque artifact URL.
#[derive(Clone)]
pub struct CertificateIssuer {
    db: Database,
    renderer: Arc<dyn Renderer>,
}

impl CertificateIssuer {
    pub fn new(db: Database, renderer: Arc<dyn Renderer>) -> Self {
        Self { db, renderer }
    }

    pub fn is_eligible(participant: &Participant) -> bool {
        participant.has_attended && participant.certificate_id.is_none()
    }

    /// Issues for one participant, using the given template or the store
    /// default.
    pub async fn issue_one(
        &self,
        participant_id: Uuid,
        template_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Certificate, AppError> {
        let participant = self.db.get_participant(participant_id).await?;
        let template = self.resolve_template(template_id).await?;
        self.issue_for(&participant, &template, now).await
    }

    /// Attempts issuance for every participant of the event independently,
    /// collecting per-item failures instead of failing fast.
    pub async fn issue_bulk(
        &self,
        event_id: Uuid,
        template_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<BulkIssueReport, AppError> {
        // Resolve shared inputs up front; these failures are batch-level.
        self.db.get_event(event_id).await?;
        let template = self.resolve_template(template_id).await?;
        let participants = self.db.list_participants(event_id, None, None).await?;

        let mut report = BulkIssueReport {
            generated: 0,
            failures: Vec::new(),
        };

        for participant in participants {
            match self.issue_for(&participant, &template, now).await {
                Ok(_) => report.generated += 1,
                Err(e) => report.failures.push(BulkFailure {
                    participant_id: participant.id,
                    reason: e.code().to_string(),
                }),
            }
        }

        info!(
            event = %event_id,
            generated = report.generated,
            failed = report.failures.len(),
            "Bulk certificate run finished"
        );
        Ok(report)
    }

    pub async fn verify(&self, code: &str) -> Result<Certificate, AppError> {
        self.db
            .find_certificate_by_verification_code(code.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("No certificate matches this code".to_string()))
    }

    async fn resolve_template(
        &self,
        template_id: Option<Uuid>,
    ) -> Result<CertificateTemplate, AppError> {
        let template = match template_id {
            Some(id) => self.db.get_template(id).await?,
            None => self
                .db
                .default_template()
                .await?
                .ok_or_else(|| AppError::NotFound("No default template configured".to_string()))?,
        };
        if !template.is_active {
            return Err(AppError::ValidationError(format!(
                "Template '{}' is not active",
                template.name
            )));
        }
        Ok(template)
    }

    async fn issue_for(
        &self,
        participant: &Participant,
        template: &CertificateTemplate,
        now: DateTime<Utc>,
    ) -> Result<Certificate, AppError> {
        if !Self::is_eligible(participant) {
            // An issued participant is reported as the already-resolved race,
            // a non-attendee as plain ineligibility.
            return Err(if participant.certificate_id.is_some() {
                AppError::CertificateAlreadyExists
            } else {
                AppError::NotEligible
            });
        }

        let event = self.db.get_event(participant.event_id).await?;
        let certificate = self.insert_with_fresh_numbers(participant, template, now).await?;

        self.db
            .set_certificate_id(participant.id, certificate.id)
            .await?;

        // Hand off to the renderer. The artifact URL is best-effort: a
        // rendering failure leaves it unset without undoing issuance.
        let job = RenderJob {
            certificate_number: certificate.certificate_number.clone(),
            template: template.clone(),
            bindings: resolve_bindings(template, participant, &event, &certificate),
        };
        match self.renderer.render(&job).await {
            Ok(url) => self.db.set_artifact_url(certificate.id, &url).await?,
            Err(e) => {
                warn!(certificate = %certificate.id, error = %e, "Renderer failed");
            }
        }

        info!(
            participant = %participant.id,
            number = %certificate.certificate_number,
            "Certificate issued"
        );
        self.db.get_certificate(certificate.id).await
    }

    async fn insert_with_fresh_numbers(
        &self,
        participant: &Participant,
        template: &CertificateTemplate,
        now: DateTime<Utc>,
    ) -> Result<Certificate, AppError> {
        for _ in 0..MAX_MINT_ATTEMPTS {
            let certificate = Certificate {
                id: Uuid::new_v4(),
                participant_id: participant.id,
                event_id: participant.event_id,
                template_id: template.id,
                certificate_number: mint_certificate_number(now),
                verification_code: mint_verification_code(),
                artifact_url: None,
                issued_at: now,
            };

            match self.db.insert_certificate(&certificate).await? {
                InsertOutcome::Inserted => return Ok(certificate),
                InsertOutcome::Conflict => {
                    // A concurrent issuance for this participant beat us;
                    // anything else was a number/code collision worth a retry.
                    if self
                        .db
                        .find_certificate_for_participant(participant.id)
                        .await?
                        .is_some()
                    {
                        return Err(AppError::CertificateAlreadyExists);
                    }
                }
            }
        }

        Err(AppError::Internal(format!(
            "could not mint unique certificate numbers after {MAX_MINT_ATTEMPTS} attempts"
        )))
    }
}

/// Resolves the template vocabulary against the participant, event, and
/// freshly minted certificate.
fn resolve_bindings(
    template: &CertificateTemplate,
    participant: &Participant,
    event: &Event,
    certificate: &Certificate,
) -> Vec<FieldBinding> {
    template
        .placeholders
        .iter()
        .map(|placeholder| {
            let value = match placeholder.key.as_str() {
                "participant_name" => participant.full_name.clone(),
                "event_name" => event.name.clone(),
                "event_date" => event.starts_at.format("%B %-d, %Y").to_string(),
                "certificate_number" => certificate.certificate_number.clone(),
                "category" => event.category.clone().unwrap_or_default(),
                "location" => event.location.clone().unwrap_or_default(),
                other => {
                    warn!(key = other, "Placeholder key has no binding");
                    String::new()
                }
            };
            FieldBinding {
                key: placeholder.key.clone(),
                value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn certificate_numbers_carry_the_issue_year() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let number = mint_certificate_number(now);
        assert!(number.starts_with("CERT-2025-"));
        assert_eq!(number.len(), "CERT-2025-".len() + 8);
    }

    #[test]
    fn verification_codes_are_uppercase_alphanumeric() {
        let code = mint_verification_code();
        assert_eq!(code.len(), VERIFICATION_CODE_LEN);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
