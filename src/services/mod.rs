//! The lifecycle services: registration, attendance, certificate issuance,
//! and template management. Handlers pass the current time in explicitly;
//! nothing in here reads the clock or any ambient state.

pub mod attendance;
pub mod certificates;
pub mod registration;
pub mod templates;


pub use attendance::AttendanceGate;
pub use certificates::{BulkFailure, BulkIssueReport, CertificateIssuer};
pub use registration::RegistrationService;
pub use templates::TemplateService;
