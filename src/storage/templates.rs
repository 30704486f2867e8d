use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use super::db::Database;
use crate::models::{CertificateTemplate, TemplateDraft};
use crate::utils::error::AppError;

impl Database {
    /// Persists a validated draft. The first template ever created becomes
    /// the default automatically.
    pub async fn insert_template(
        &self,
        draft: TemplateDraft,
        now: DateTime<Utc>,
    ) -> Result<CertificateTemplate, AppError> {
        let mut tx = self.pool().begin().await?;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM templates")
            .fetch_one(&mut *tx)
            .await?;
        let is_default = count == 0;

        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO templates (id, name, description, background_image, width, height, \
             orientation, background_color, placeholders, is_default, is_active, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.background_image)
        .bind(draft.width)
        .bind(draft.height)
        .bind(draft.orientation)
        .bind(&draft.background_color)
        .bind(Json(&draft.placeholders))
        .bind(is_default)
        .bind(draft.is_active)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        self.get_template(id).await
    }

    pub async fn get_template(&self, id: Uuid) -> Result<CertificateTemplate, AppError> {
        sqlx::query_as::<_, CertificateTemplate>("SELECT * FROM templates WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Template {id}")))
    }

    pub async fn list_templates(&self) -> Result<Vec<CertificateTemplate>, AppError> {
        let templates = sqlx::query_as::<_, CertificateTemplate>(
            "SELECT * FROM templates ORDER BY updated_at DESC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(templates)
    }

    pub async fn default_template(&self) -> Result<Option<CertificateTemplate>, AppError> {
        let template = sqlx::query_as::<_, CertificateTemplate>(
            "SELECT * FROM templates WHERE is_default = 1",
        )
        .fetch_optional(self.pool())
        .await?;
        Ok(template)
    }

    /// Replaces the stored contents with a validated draft. Default status is
    /// not touched here; that goes through `set_default_template`.
    pub async fn update_template(
        &self,
        id: Uuid,
        draft: TemplateDraft,
        now: DateTime<Utc>,
    ) -> Result<CertificateTemplate, AppError> {
        let result = sqlx::query(
            "UPDATE templates SET name = ?, description = ?, background_image = ?, width = ?, \
             height = ?, orientation = ?, background_color = ?, placeholders = ?, is_active = ?, \
             updated_at = ? WHERE id = ?",
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.background_image)
        .bind(draft.width)
        .bind(draft.height)
        .bind(draft.orientation)
        .bind(&draft.background_color)
        .bind(Json(&draft.placeholders))
        .bind(draft.is_active)
        .bind(now)
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Template {id}")));
        }
        self.get_template(id).await
    }

    /// Clears the previous default and sets the new one in a single
    /// transaction, so there is never a moment with two defaults.
    pub async fn set_default_template(&self, id: Uuid) -> Result<CertificateTemplate, AppError> {
        let mut tx = self.pool().begin().await?;

        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM templates WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound(format!("Template {id}")));
        }

        sqlx::query("UPDATE templates SET is_default = 0 WHERE is_default = 1")
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE templates SET is_default = 1 WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        self.get_template(id).await
    }

    /// Deletes a template. When the default goes away, the most recently
    /// updated survivor is promoted so a populated store always has a default.
    pub async fn delete_template(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool().begin().await?;

        let row: Option<(bool,)> = sqlx::query_as("SELECT is_default FROM templates WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some((was_default,)) = row else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM templates WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if was_default {
            sqlx::query(
                "UPDATE templates SET is_default = 1 WHERE id = \
                 (SELECT id FROM templates ORDER BY updated_at DESC LIMIT 1)",
            )
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }
}
