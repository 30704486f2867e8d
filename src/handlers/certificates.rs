use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Debug, Default, Deserialize)]
pub struct IssueRequest {
    /// Falls back to the store's default template when omitted.
    pub template_id: Option<Uuid>,
}

pub async fn issue_one(
    State(state): State<AppState>,
    Path(participant_id): Path<Uuid>,
    body: Option<Json<IssueRequest>>,
) -> Result<Response, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let certificate = state
        .certificates
        .issue_one(participant_id, request.template_id, Utc::now())
        .await?;
    Ok(created(certificate, "Certificate issued"))
}

/// Bulk issuance for an event. Always returns the per-item report; partial
/// failure is data, not an error.
pub async fn issue_bulk(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    body: Option<Json<IssueRequest>>,
) -> Result<Response, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let report = state
        .certificates
        .issue_bulk(event_id, request.template_id, Utc::now())
        .await?;
    Ok(success(report, "Bulk certificate run finished"))
}

pub async fn list_event_certificates(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let certificates = state.db.list_certificates_for_event(event_id).await?;
    Ok(success(certificates, "Certificates retrieved"))
}

/// Public verification lookup by the certificate-scoped code.
pub async fn verify_certificate(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    let certificate = state.certificates.verify(&code).await?;
    Ok(success(certificate, "Certificate verified"))
}
