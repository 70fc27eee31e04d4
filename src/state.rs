use std::time::Duration;

use sqlx::SqlitePool;

use crate::services::{DomainService, SessionRegistry};

#[derive(Clone)]
pub struct AppState {
    pub service: DomainService,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(db: SqlitePool, session_ttl: Duration) -> Self {
        Self {
            service: DomainService::new(db),
            sessions: SessionRegistry::new(session_ttl),
        }
    }
}
