use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::extract::{AppPath, CurrentActor};
use crate::models::{EventId, JoinOutcome};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{empty_success, success};

#[derive(Serialize)]
pub struct JoinPayload {
    pub event_id: EventId,
    pub outcome: JoinOutcome,
}

pub async fn join_event(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    AppPath(event_id): AppPath<EventId>,
) -> AppResult<Response> {
    let outcome = state.service.join_event(&actor, event_id).await?;
    let message = match outcome {
        JoinOutcome::Joined => "You have successfully joined this event",
        JoinOutcome::AlreadyJoined => "You already joined this event",
    };
    Ok(success(JoinPayload { event_id, outcome }, message))
}

pub async fn unjoin_event(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    AppPath(event_id): AppPath<EventId>,
) -> AppResult<Response> {
    state.service.unjoin_event(&actor, event_id).await?;
    Ok(empty_success("You have been unregistered from this event"))
}

pub async fn joined_events(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> AppResult<Response> {
    let events = state.service.joined_events(&actor).await?;
    Ok(success(events, "Your joined events"))
}
