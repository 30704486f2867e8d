use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Placeholder keys the renderer knows how to bind. Extending the vocabulary
/// means adding an entry here and a binding in the certificate service.
pub const PLACEHOLDER_KEYS: &[&str] = &[
    "participant_name",
    "event_name",
    "event_date",
    "certificate_number",
    "category",
    "location",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A flat text field positioned in design space, i.e. relative to the
/// template's `width`/`height`, never to any display canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeholder {
    pub key: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub font_family: String,
    pub color: String,
    pub align: TextAlign,
    pub max_width: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CertificateTemplate {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Opaque reference to the background asset; storage is external.
    pub background_image: Option<String>,
    pub width: f64,
    pub height: f64,
    pub orientation: Orientation,
    pub background_color: String,
    pub placeholders: Json<Vec<Placeholder>>,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unsaved template contents, as submitted by the editing surface.
/// Validated by `layout::validate_template` before any persistence.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    pub description: Option<String>,
    pub background_image: Option<String>,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_orientation")]
    pub orientation: Orientation,
    #[serde(default = "default_background_color")]
    pub background_color: String,
    pub placeholders: Vec<Placeholder>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
}

fn default_orientation() -> Orientation {
    Orientation::Landscape
}

fn default_background_color() -> String {
    "#ffffff".to_string()
}

fn default_is_active() -> bool {
    true
}
