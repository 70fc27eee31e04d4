use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::models::event::{Event, EventDraft, EventId, EventSummary};
use crate::models::user::normalize_email;
use crate::repositories::registrations::RegistrationLedger;
use crate::repositories::is_foreign_key_violation;
use crate::utils::error::{AppError, AppResult};

#[derive(Clone)]
pub struct EventRepository {
    db: SqlitePool,
}

impl EventRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(&self, draft: &EventDraft, creator_email: &str) -> AppResult<EventId> {
        let creator_email = normalize_email(creator_email);
        let res = sqlx::query(
            r#"
                INSERT INTO events (title, description, location, date, created_by)
                VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.location)
        .bind(draft.date)
        .bind(&creator_email)
        .execute(&self.db)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::Validation(format!("No account exists for '{}'", creator_email))
            } else {
                AppError::Database(e)
            }
        })?;

        let id = res.last_insert_rowid();
        info!(event_id = id, created_by = %creator_email, date = %draft.date, "Event created");
        Ok(id)
    }

    pub async fn get(&self, id: EventId) -> AppResult<Event> {
        sqlx::query_as::<_, Event>(
            r#"
                SELECT id, title, description, location, date, created_by
                FROM events
                WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| event_not_found(id))
    }

    /// Every event, soonest first. Events on the same date keep insertion order.
    pub async fn list_all(&self) -> AppResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            r#"
                SELECT id, title, description, location, date, created_by
                FROM events
                ORDER BY date ASC, id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        debug!(count = events.len(), "Listed all events");
        Ok(events)
    }

    pub async fn list_by_creator(&self, email: &str) -> AppResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            r#"
                SELECT id, title, description, location, date, created_by
                FROM events
                WHERE created_by = ?
                ORDER BY date ASC, id ASC
            "#,
        )
        .bind(normalize_email(email))
        .fetch_all(&self.db)
        .await?;
        Ok(events)
    }

    /// Same ordering as [`Self::list_by_creator`], with the number of registrations per event.
    pub async fn list_by_creator_with_counts(&self, email: &str) -> AppResult<Vec<EventSummary>> {
        let summaries = sqlx::query_as::<_, EventSummary>(
            r#"
                SELECT e.id, e.title, e.description, e.location, e.date, e.created_by,
                       COUNT(r.id) AS registrant_count
                FROM events e
                LEFT JOIN registrations r ON r.event_id = e.id
                WHERE e.created_by = ?
                GROUP BY e.id
                ORDER BY e.date ASC, e.id ASC
            "#,
        )
        .bind(normalize_email(email))
        .fetch_all(&self.db)
        .await?;
        Ok(summaries)
    }

    /// Overwrites every mutable field.
    pub async fn update(&self, id: EventId, draft: &EventDraft) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE events
                SET title = ?, description = ?, location = ?, date = ?
                WHERE id = ?
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.location)
        .bind(draft.date)
        .bind(id)
        .execute(&self.db)
        .await?;

        if res.rows_affected() < 1 {
            return Err(event_not_found(id));
        }

        info!(event_id = id, "Event updated");
        Ok(())
    }

    /// Deletes the event and all of its registrations in one transaction.
    /// Returns how many registrations went with it.
    pub async fn delete(&self, id: EventId) -> AppResult<u64> {
        let mut tx = self.db.begin().await?;

        let removed = RegistrationLedger::delete_all_for_event(&mut tx, id).await?;

        let res = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // Dropping `tx` here rolls back the registration delete.
        if res.rows_affected() < 1 {
            return Err(event_not_found(id));
        }

        tx.commit().await?;

        info!(event_id = id, registrations_removed = removed, "Event deleted");
        Ok(removed)
    }
}

pub(crate) fn event_not_found(id: EventId) -> AppError {
    AppError::NotFound(format!("Event {} was not found", id))
}
