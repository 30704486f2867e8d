use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::layout;
use crate::models::{CertificateTemplate, TemplateDraft};
use crate::storage::Database;
use crate::utils::error::AppError;

/// Template CRUD with validation in front of every write. Geometry and the
/// validation rules themselves live in `layout`; this service only wires
/// them to storage.
#[derive(Clone)]
pub struct TemplateService {
    db: Database,
}

impl TemplateService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        draft: TemplateDraft,
        now: DateTime<Utc>,
    ) -> Result<CertificateTemplate, AppError> {
        Self::validated(&draft)?;
        self.db.insert_template(draft, now).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        draft: TemplateDraft,
        now: DateTime<Utc>,
    ) -> Result<CertificateTemplate, AppError> {
        Self::validated(&draft)?;
        self.db.update_template(id, draft, now).await
    }

    pub async fn get(&self, id: Uuid) -> Result<CertificateTemplate, AppError> {
        self.db.get_template(id).await
    }

    pub async fn list(&self) -> Result<Vec<CertificateTemplate>, AppError> {
        self.db.list_templates().await
    }

    pub async fn set_default(&self, id: Uuid) -> Result<CertificateTemplate, AppError> {
        self.db.set_default_template(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        self.db.delete_template(id).await
    }

    fn validated(draft: &TemplateDraft) -> Result<(), AppError> {
        let violations = layout::validate_template(draft);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(AppError::TemplateValidation(violations))
        }
    }
}
