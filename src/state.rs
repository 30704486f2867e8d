use std::sync::Arc;

use crate::config::Config;
use crate::external::{LogNotifier, Notifier, Renderer, StaticArtifactRenderer};
use crate::services::{AttendanceGate, CertificateIssuer, RegistrationService, TemplateService};
use crate::storage::Database;

/// Shared handler state: the database plus the lifecycle services wired to
/// their collaborators.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub registration: RegistrationService,
    pub attendance: AttendanceGate,
    pub certificates: CertificateIssuer,
    pub templates: TemplateService,
}

impl AppState {
    pub fn new(db: Database, config: &Config) -> Self {
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
        let renderer: Arc<dyn Renderer> =
            Arc::new(StaticArtifactRenderer::new(config.artifact_base_url.clone()));
        Self::with_collaborators(db, config, notifier, renderer)
    }

    pub fn with_collaborators(
        db: Database,
        config: &Config,
        notifier: Arc<dyn Notifier>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            registration: RegistrationService::new(db.clone(), notifier),
            attendance: AttendanceGate::new(db.clone(), config.window_close),
            certificates: CertificateIssuer::new(db.clone(), renderer),
            templates: TemplateService::new(db.clone()),
            db,
        }
    }
}
