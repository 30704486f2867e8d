use axum::routing::{get, post};
use axum::Router;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{attendance, certificates, events, health_check, registration, templates};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Admin surface
        .route("/events", post(events::create_event).get(events::list_events))
        .route(
            "/events/:id",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route("/events/:id/participants", get(events::list_participants))
        .route(
            "/events/:id/certificates",
            post(certificates::issue_bulk).get(certificates::list_event_certificates),
        )
        .route(
            "/templates",
            post(templates::create_template).get(templates::list_templates),
        )
        .route(
            "/templates/:id",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
        .route("/templates/:id/default", post(templates::set_default_template))
        .route(
            "/participants/:id/certificate",
            post(certificates::issue_one),
        )
        // Participant surface
        .route("/events/:id/register", post(registration::register))
        .route("/events/:id/attendance", post(attendance::redeem))
        .route("/events/:id/registration", get(registration::my_registration))
        // Public
        .route(
            "/certificates/verify/:code",
            get(certificates::verify_certificate),
        )
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
