use std::env;
use std::path::PathBuf;

pub mod cors;
pub mod headers;

pub use cors::create_cors_layer;
pub use headers::create_security_headers_layer;

/// When the attendance window closes again after opening at event start.
/// The reference behavior never closes it; `EventEnd` closes at `ends_at`
/// for events that declare one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowClose {
    Never,
    EventEnd,
}

impl WindowClose {
    fn from_env() -> Self {
        match env::var("ATTENDANCE_WINDOW_CLOSE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "event-end" | "event_end" => WindowClose::EventEnd,
            _ => WindowClose::Never,
        }
    }
}

pub struct Config {
    pub database_path: PathBuf,
    pub port: u16,
    pub window_close: WindowClose,
    pub artifact_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/tessera.db".to_string())
                .into(),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            window_close: WindowClose::from_env(),
            artifact_base_url: env::var("ARTIFACT_BASE_URL")
                .unwrap_or_else(|_| "/certificates".to_string()),
        }
    }
}
