use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{apply_security_headers, create_cors_layer, Config};
use crate::handlers::{auth, events, health_check, registrations};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/events", get(events::list_events).post(events::create_event))
        .route("/events/mine", get(events::my_events))
        .route(
            "/events/:id",
            put(events::update_event).delete(events::delete_event),
        )
        .route("/events/:id/volunteers", get(events::event_volunteers))
        .route(
            "/events/:id/join",
            post(registrations::join_event).delete(registrations::unjoin_event),
        )
        .route("/me/events", get(registrations::joined_events))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    apply_security_headers(router, config.production)
        .layer(create_cors_layer(&config.allowed_origins))
}
