//! Role-checked use cases over the three stores.
//!
//! Callers pass the acting [`Actor`] into every operation; nothing here reads
//! ambient session state.

use std::collections::BTreeSet;

use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::models::{
    normalize_email, Actor, Credentials, Event, EventDraft, EventId, EventSummary, JoinOutcome,
    NewUser, Role, User,
};
use crate::repositories::{CredentialStore, EventRepository, RegistrationLedger};
use crate::utils::error::{AppError, AppResult};

#[derive(Clone)]
pub struct DomainService {
    credentials: CredentialStore,
    events: EventRepository,
    registrations: RegistrationLedger,
}

impl DomainService {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            credentials: CredentialStore::new(db.clone()),
            events: EventRepository::new(db.clone()),
            registrations: RegistrationLedger::new(db),
        }
    }

    pub async fn register(&self, new_user: NewUser) -> AppResult<User> {
        let new_user = new_user.validated()?;
        let id = self.credentials.register(&new_user).await?;
        Ok(User {
            id,
            name: new_user.name,
            email: new_user.email,
            role: new_user.role,
        })
    }

    pub async fn authenticate(&self, credentials: Credentials) -> AppResult<User> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(AppError::Validation("Email and password are required".into()));
        }
        self.credentials.authenticate(&credentials).await
    }

    /// Public listing; needs no actor.
    pub async fn browse_events(&self) -> AppResult<Vec<Event>> {
        self.events.list_all().await
    }

    pub async fn create_event(&self, actor: &Actor, draft: EventDraft) -> AppResult<Event> {
        require_role(actor, Role::Ngo)?;
        let draft = draft.validated()?;

        // The session may outlive the account it was issued for.
        match self.credentials.find_by_email(&actor.email).await? {
            Some(user) if user.role == Role::Ngo => {}
            _ => {
                warn!(actor = %actor.email, "Event creator is not a registered NGO");
                return Err(AppError::Forbidden(
                    "Only registered NGO accounts can create events".into(),
                ));
            }
        }

        let id = self.events.create(&draft, &actor.email).await?;
        Ok(Event {
            id,
            title: draft.title,
            description: draft.description,
            location: draft.location,
            date: draft.date,
            created_by: normalize_email(&actor.email),
        })
    }

    pub async fn update_event(
        &self,
        actor: &Actor,
        event_id: EventId,
        draft: EventDraft,
    ) -> AppResult<Event> {
        require_role(actor, Role::Ngo)?;
        let draft = draft.validated()?;
        let event = self.owned_event(actor, event_id).await?;

        self.events.update(event_id, &draft).await?;
        Ok(Event {
            id: event.id,
            title: draft.title,
            description: draft.description,
            location: draft.location,
            date: draft.date,
            created_by: event.created_by,
        })
    }

    pub async fn delete_event(&self, actor: &Actor, event_id: EventId) -> AppResult<()> {
        require_role(actor, Role::Ngo)?;
        self.owned_event(actor, event_id).await?;
        let removed = self.events.delete(event_id).await?;
        info!(event_id, actor = %actor.email, registrations_removed = removed, "Event removed by owner");
        Ok(())
    }

    /// The NGO dashboard: own events with registrant counts.
    pub async fn my_events(&self, actor: &Actor) -> AppResult<Vec<EventSummary>> {
        require_role(actor, Role::Ngo)?;
        self.events.list_by_creator_with_counts(&actor.email).await
    }

    pub async fn event_volunteers(
        &self,
        actor: &Actor,
        event_id: EventId,
    ) -> AppResult<BTreeSet<String>> {
        require_role(actor, Role::Ngo)?;
        self.owned_event(actor, event_id).await?;
        self.registrations.list_volunteers(event_id).await
    }

    pub async fn join_event(&self, actor: &Actor, event_id: EventId) -> AppResult<JoinOutcome> {
        require_role(actor, Role::Volunteer)?;
        self.registrations.join(event_id, &actor.email).await
    }

    pub async fn unjoin_event(&self, actor: &Actor, event_id: EventId) -> AppResult<()> {
        require_role(actor, Role::Volunteer)?;
        self.registrations.unjoin(event_id, &actor.email).await
    }

    pub async fn joined_events(&self, actor: &Actor) -> AppResult<Vec<Event>> {
        require_role(actor, Role::Volunteer)?;
        self.registrations.list_joined_events(&actor.email).await
    }

    async fn owned_event(&self, actor: &Actor, event_id: EventId) -> AppResult<Event> {
        let event = self.events.get(event_id).await?;
        if event.created_by != normalize_email(&actor.email) {
            warn!(event_id, actor = %actor.email, owner = %event.created_by, "Rejected non-owner access to event");
            return Err(AppError::Forbidden(
                "Only the organiser of this event can manage it".into(),
            ));
        }
        Ok(event)
    }
}

fn require_role(actor: &Actor, role: Role) -> AppResult<()> {
    if actor.role != role {
        warn!(actor = %actor.email, role = %actor.role, required = %role, "Role check failed");
        return Err(AppError::Forbidden(format!(
            "This action requires the {} role",
            role
        )));
    }
    Ok(())
}
