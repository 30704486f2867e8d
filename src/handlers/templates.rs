use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use crate::models::TemplateDraft;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, empty_success, success};

pub async fn create_template(
    State(state): State<AppState>,
    Json(draft): Json<TemplateDraft>,
) -> Result<Response, AppError> {
    let template = state.templates.create(draft, Utc::now()).await?;
    Ok(created(template, "Template created"))
}

pub async fn list_templates(State(state): State<AppState>) -> Result<Response, AppError> {
    let templates = state.templates.list().await?;
    Ok(success(templates, "Templates retrieved"))
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let template = state.templates.get(id).await?;
    Ok(success(template, "Template retrieved"))
}

pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<TemplateDraft>,
) -> Result<Response, AppError> {
    let template = state.templates.update(id, draft, Utc::now()).await?;
    Ok(success(template, "Template updated"))
}

pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    if !state.templates.delete(id).await? {
        return Err(AppError::NotFound(format!("Template {id}")));
    }
    Ok(empty_success("Template deleted"))
}

pub async fn set_default_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let template = state.templates.set_default(id).await?;
    Ok(success(template, "Default template updated"))
}
