use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::event::EventId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: i64,
    pub event_id: EventId,
    pub volunteer_email: String,
}

/// Result of a join attempt. A repeated join is reported, not treated as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOutcome {
    Joined,
    AlreadyJoined,
}
