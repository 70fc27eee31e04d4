use std::collections::BTreeSet;

use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::extract::{AppJson, AppPath, CurrentActor};
use crate::models::{EventDraft, EventId};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{created, empty_success, success};

#[derive(Serialize)]
pub struct VolunteersPayload {
    pub event_id: EventId,
    pub count: usize,
    pub volunteers: BTreeSet<String>,
}

pub async fn list_events(State(state): State<AppState>) -> AppResult<Response> {
    let events = state.service.browse_events().await?;
    let message = if events.is_empty() {
        "No events available at the moment"
    } else {
        "Events retrieved"
    };
    Ok(success(events, message))
}

pub async fn create_event(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    AppJson(draft): AppJson<EventDraft>,
) -> AppResult<Response> {
    let event = state.service.create_event(&actor, draft).await?;
    Ok(created(event, "Event created successfully"))
}

pub async fn my_events(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> AppResult<Response> {
    let events = state.service.my_events(&actor).await?;
    Ok(success(events, "Your created events"))
}

pub async fn update_event(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    AppPath(event_id): AppPath<EventId>,
    AppJson(draft): AppJson<EventDraft>,
) -> AppResult<Response> {
    let event = state.service.update_event(&actor, event_id, draft).await?;
    Ok(success(event, "Event updated successfully"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    AppPath(event_id): AppPath<EventId>,
) -> AppResult<Response> {
    state.service.delete_event(&actor, event_id).await?;
    Ok(empty_success("Event deleted successfully"))
}

pub async fn event_volunteers(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    AppPath(event_id): AppPath<EventId>,
) -> AppResult<Response> {
    let volunteers = state.service.event_volunteers(&actor, event_id).await?;
    let payload = VolunteersPayload {
        event_id,
        count: volunteers.len(),
        volunteers,
    };
    Ok(success(payload, "Registered volunteers"))
}
