//! Placeholder coordinate engine for certificate templates.
//!
//! Everything here is deterministic and I/O-free: the editing surface and the
//! renderer both work in design space (the template's own `width` x `height`),
//! and these functions are the only place display-canvas math happens.

use serde::Serialize;

use crate::models::template::PLACEHOLDER_KEYS;
use crate::models::{Placeholder, TemplateDraft};

/// Display scale never exceeds this, leaving margin around the canvas even
/// when the viewport is larger than the design.
pub const MAX_DISPLAY_SCALE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Uniform aspect-preserving scale from design space into a display canvas,
/// capped at [`MAX_DISPLAY_SCALE`].
pub fn display_scale(design: Size, display: Size) -> f64 {
    let sx = display.width / design.width;
    let sy = display.height / design.height;
    sx.min(sy).min(MAX_DISPLAY_SCALE)
}

pub fn design_to_display(point: Point, design: Size, display: Size) -> Point {
    let scale = display_scale(design, display);
    Point {
        x: point.x * scale,
        y: point.y * scale,
    }
}

/// Inverse of the display scaling, applied to drag deltas measured on the
/// display canvas. Caller guarantees `scale > 0`.
pub fn display_delta_to_design(delta: Point, scale: f64) -> Point {
    Point {
        x: delta.x / scale,
        y: delta.y / scale,
    }
}

/// Moves a placeholder by a design-space delta, clamping the result into the
/// design bounds so a drag can never push a field off the template.
pub fn apply_drag(placeholder: &Placeholder, delta: Point, design: Size) -> Placeholder {
    let mut moved = placeholder.clone();
    moved.x = (placeholder.x + delta.x).clamp(0.0, design.width);
    moved.y = (placeholder.y + delta.y).clamp(0.0, design.height);
    moved
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateViolation {
    pub code: &'static str,
    pub message: String,
}

impl TemplateViolation {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Checks a draft against the savable-template rules. Returns every violation
/// found rather than stopping at the first.
pub fn validate_template(draft: &TemplateDraft) -> Vec<TemplateViolation> {
    let mut violations = Vec::new();

    if draft.name.trim().is_empty() {
        violations.push(TemplateViolation::new(
            "EMPTY_NAME",
            "Template name must not be empty",
        ));
    }

    if draft.width <= 0.0 || draft.height <= 0.0 {
        violations.push(TemplateViolation::new(
            "INVALID_SIZE",
            format!(
                "Design size must be positive, got {}x{}",
                draft.width, draft.height
            ),
        ));
    }

    if draft.placeholders.is_empty() {
        violations.push(TemplateViolation::new(
            "NO_PLACEHOLDERS",
            "A template needs at least one placeholder",
        ));
    }

    let mut seen = Vec::with_capacity(draft.placeholders.len());
    for placeholder in &draft.placeholders {
        let key = placeholder.key.as_str();

        if !PLACEHOLDER_KEYS.contains(&key) {
            violations.push(TemplateViolation::new(
                "UNKNOWN_KEY",
                format!("Placeholder key '{key}' is not in the known vocabulary"),
            ));
        }

        if seen.contains(&key) {
            violations.push(TemplateViolation::new(
                "DUPLICATE_KEY",
                format!("Placeholder key '{key}' appears more than once"),
            ));
        } else {
            seen.push(key);
        }

        let in_bounds = placeholder.x >= 0.0
            && placeholder.x <= draft.width
            && placeholder.y >= 0.0
            && placeholder.y <= draft.height;
        if !in_bounds {
            violations.push(TemplateViolation::new(
                "OUT_OF_BOUNDS",
                format!(
                    "Placeholder '{key}' at ({}, {}) is outside the {}x{} design",
                    placeholder.x, placeholder.y, draft.width, draft.height
                ),
            ));
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TextAlign;

    const EPSILON: f64 = 1e-9;

    fn placeholder(key: &str, x: f64, y: f64) -> Placeholder {
        Placeholder {
            key: key.to_string(),
            label: key.replace('_', " "),
            x,
            y,
            font_size: 24.0,
            font_family: "serif".to_string(),
            color: "#000000".to_string(),
            align: TextAlign::Center,
            max_width: None,
        }
    }

    fn draft(placeholders: Vec<Placeholder>) -> TemplateDraft {
        TemplateDraft {
            name: "Classic".to_string(),
            description: None,
            background_image: None,
            width: 1123.0,
            height: 794.0,
            orientation: crate::models::Orientation::Landscape,
            background_color: "#ffffff".to_string(),
            placeholders,
            is_active: true,
        }
    }

    #[test]
    fn scale_is_uniform_and_capped() {
        let design = Size::new(1000.0, 500.0);

        // Limiting axis wins.
        let scale = display_scale(design, Size::new(500.0, 500.0));
        assert!((scale - 0.5).abs() < EPSILON);

        // A display larger than the design still caps at 0.8.
        let scale = display_scale(design, Size::new(4000.0, 4000.0));
        assert!((scale - MAX_DISPLAY_SCALE).abs() < EPSILON);
    }

    #[test]
    fn design_to_display_applies_the_scale() {
        let design = Size::new(1000.0, 500.0);
        let display = Size::new(500.0, 500.0);

        let mapped = design_to_display(Point { x: 200.0, y: 100.0 }, design, display);
        assert!((mapped.x - 100.0).abs() < EPSILON);
        assert!((mapped.y - 50.0).abs() < EPSILON);
    }

    #[test]
    fn delta_round_trips_through_the_scale() {
        for scale in [0.1, 0.5, 0.8] {
            let delta = Point { x: 37.5, y: -12.25 };
            let display = Point {
                x: delta.x * scale,
                y: delta.y * scale,
            };
            let back = display_delta_to_design(display, scale);
            assert!((back.x - delta.x).abs() < EPSILON);
            assert!((back.y - delta.y).abs() < EPSILON);
        }
    }

    #[test]
    fn drag_clamps_to_design_bounds() {
        let design = Size::new(1000.0, 500.0);
        let start = placeholder("participant_name", 900.0, 450.0);

        let dragged = apply_drag(&start, Point { x: 1e12, y: 1e12 }, design);
        assert_eq!(dragged.x, 1000.0);
        assert_eq!(dragged.y, 500.0);

        let dragged = apply_drag(&start, Point { x: -1e12, y: -1e12 }, design);
        assert_eq!(dragged.x, 0.0);
        assert_eq!(dragged.y, 0.0);

        // An in-bounds drag is applied verbatim.
        let dragged = apply_drag(&start, Point { x: -10.0, y: 5.0 }, design);
        assert!((dragged.x - 890.0).abs() < EPSILON);
        assert!((dragged.y - 455.0).abs() < EPSILON);
    }

    #[test]
    fn valid_draft_passes() {
        let draft = draft(vec![
            placeholder("participant_name", 561.0, 380.0),
            placeholder("event_name", 561.0, 440.0),
        ]);
        assert!(validate_template(&draft).is_empty());
    }

    #[test]
    fn empty_name_and_no_placeholders_are_reported_together() {
        let mut draft = draft(vec![]);
        draft.name = "   ".to_string();

        let violations = validate_template(&draft);
        let codes: Vec<_> = violations.iter().map(|v| v.code).collect();
        assert!(codes.contains(&"EMPTY_NAME"));
        assert!(codes.contains(&"NO_PLACEHOLDERS"));
    }

    #[test]
    fn unknown_and_duplicate_keys_are_rejected() {
        let draft = draft(vec![
            placeholder("participant_name", 10.0, 10.0),
            placeholder("participant_name", 20.0, 20.0),
            placeholder("qr_code", 30.0, 30.0),
        ]);

        let codes: Vec<_> = validate_template(&draft)
            .into_iter()
            .map(|v| v.code)
            .collect();
        assert!(codes.contains(&"DUPLICATE_KEY"));
        assert!(codes.contains(&"UNKNOWN_KEY"));
    }

    #[test]
    fn out_of_bounds_position_is_rejected() {
        let draft = draft(vec![placeholder("participant_name", 2000.0, 10.0)]);

        let violations = validate_template(&draft);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, "OUT_OF_BOUNDS");
    }
}
