use uuid::Uuid;

use super::db::{is_unique_violation, Database};
use super::participants::InsertOutcome;
use crate::models::Certificate;
use crate::utils::error::AppError;

impl Database {
    /// The UNIQUE index on `participant_id` is the write-time eligibility
    /// re-check: of two racing inserts for one participant, exactly one lands.
    pub async fn insert_certificate(
        &self,
        certificate: &Certificate,
    ) -> Result<InsertOutcome, AppError> {
        let result = sqlx::query(
            "INSERT INTO certificates (id, participant_id, event_id, template_id, \
             certificate_number, verification_code, artifact_url, issued_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(certificate.id)
        .bind(certificate.participant_id)
        .bind(certificate.event_id)
        .bind(certificate.template_id)
        .bind(&certificate.certificate_number)
        .bind(&certificate.verification_code)
        .bind(&certificate.artifact_url)
        .bind(certificate.issued_at)
        .execute(self.pool())
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_certificate(&self, id: Uuid) -> Result<Certificate, AppError> {
        sqlx::query_as::<_, Certificate>("SELECT * FROM certificates WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Certificate {id}")))
    }

    pub async fn find_certificate_for_participant(
        &self,
        participant_id: Uuid,
    ) -> Result<Option<Certificate>, AppError> {
        let certificate = sqlx::query_as::<_, Certificate>(
            "SELECT * FROM certificates WHERE participant_id = ?",
        )
        .bind(participant_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(certificate)
    }

    /// Public verification lookup, keyed by the certificate-scoped code.
    pub async fn find_certificate_by_verification_code(
        &self,
        code: &str,
    ) -> Result<Option<Certificate>, AppError> {
        let certificate = sqlx::query_as::<_, Certificate>(
            "SELECT * FROM certificates WHERE verification_code = ?",
        )
        .bind(code)
        .fetch_optional(self.pool())
        .await?;
        Ok(certificate)
    }

    pub async fn list_certificates_for_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<Certificate>, AppError> {
        let certificates = sqlx::query_as::<_, Certificate>(
            "SELECT * FROM certificates WHERE event_id = ? ORDER BY issued_at",
        )
        .bind(event_id)
        .fetch_all(self.pool())
        .await?;
        Ok(certificates)
    }

    pub async fn set_artifact_url(&self, id: Uuid, url: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE certificates SET artifact_url = ? WHERE id = ?")
            .bind(url)
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }
}
