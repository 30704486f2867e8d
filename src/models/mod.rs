pub mod certificate;
pub mod event;
pub mod participant;
pub mod template;

pub use certificate::Certificate;
pub use event::{Event, NewEvent, UpdateEvent};
pub use participant::{AttendanceStatus, Identity, Participant};
pub use template::{
    CertificateTemplate, Orientation, Placeholder, TemplateDraft, TextAlign, PLACEHOLDER_KEYS,
};
