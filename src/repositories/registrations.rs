use std::collections::BTreeSet;

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::models::event::{Event, EventId};
use crate::models::registration::{JoinOutcome, Registration};
use crate::models::user::normalize_email;
use crate::repositories::events::event_not_found;
use crate::repositories::{is_foreign_key_violation, is_unique_violation};
use crate::utils::error::{AppError, AppResult};

/// The volunteer/event join table. At most one row per (event, volunteer).
#[derive(Clone)]
pub struct RegistrationLedger {
    db: SqlitePool,
}

impl RegistrationLedger {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Inserts the registration; the unique constraint decides whether it already existed.
    pub async fn join(&self, event_id: EventId, volunteer_email: &str) -> AppResult<JoinOutcome> {
        let volunteer_email = normalize_email(volunteer_email);
        let res = sqlx::query(
            r#"
                INSERT INTO registrations (event_id, volunteer_email)
                VALUES (?, ?)
            "#,
        )
        .bind(event_id)
        .bind(&volunteer_email)
        .execute(&self.db)
        .await;

        match res {
            Ok(_) => {
                info!(event_id, volunteer = %volunteer_email, "Volunteer joined event");
                Ok(JoinOutcome::Joined)
            }
            Err(e) if is_unique_violation(&e) => {
                debug!(event_id, volunteer = %volunteer_email, "Volunteer already joined");
                Ok(JoinOutcome::AlreadyJoined)
            }
            Err(e) if is_foreign_key_violation(&e) => {
                if self.event_exists(event_id).await? {
                    Err(AppError::NotFound(format!(
                        "No account exists for '{}'",
                        volunteer_email
                    )))
                } else {
                    Err(event_not_found(event_id))
                }
            }
            Err(e) => Err(AppError::Database(e)),
        }
    }

    async fn event_exists(&self, event_id: EventId) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE id = ?)")
            .bind(event_id)
            .fetch_one(&self.db)
            .await?;
        Ok(exists)
    }

    /// Removing a registration that does not exist is not an error.
    pub async fn unjoin(&self, event_id: EventId, volunteer_email: &str) -> AppResult<()> {
        let volunteer_email = normalize_email(volunteer_email);
        let res = sqlx::query(
            r#"
                DELETE FROM registrations
                WHERE event_id = ? AND volunteer_email = ?
            "#,
        )
        .bind(event_id)
        .bind(&volunteer_email)
        .execute(&self.db)
        .await?;

        info!(
            event_id,
            volunteer = %volunteer_email,
            removed = res.rows_affected(),
            "Volunteer left event"
        );
        Ok(())
    }

    pub async fn list_registrations(&self, event_id: EventId) -> AppResult<Vec<Registration>> {
        let rows = sqlx::query_as::<_, Registration>(
            r#"
                SELECT id, event_id, volunteer_email
                FROM registrations
                WHERE event_id = ?
                ORDER BY id ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    pub async fn list_volunteers(&self, event_id: EventId) -> AppResult<BTreeSet<String>> {
        Ok(self
            .list_registrations(event_id)
            .await?
            .into_iter()
            .map(|r| r.volunteer_email)
            .collect())
    }

    /// Events the volunteer is registered for, soonest first.
    pub async fn list_joined_events(&self, volunteer_email: &str) -> AppResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            r#"
                SELECT e.id, e.title, e.description, e.location, e.date, e.created_by
                FROM events e
                INNER JOIN registrations r ON r.event_id = e.id
                WHERE r.volunteer_email = ?
                ORDER BY e.date ASC, e.id ASC
            "#,
        )
        .bind(normalize_email(volunteer_email))
        .fetch_all(&self.db)
        .await?;
        Ok(events)
    }

    /// Runs on the caller's connection so it can share the event delete's transaction.
    pub(crate) async fn delete_all_for_event(
        conn: &mut SqliteConnection,
        event_id: EventId,
    ) -> AppResult<u64> {
        let res = sqlx::query("DELETE FROM registrations WHERE event_id = ?")
            .bind(event_id)
            .execute(conn)
            .await?;
        Ok(res.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory_pool;
    use crate::models::Role;
    use crate::repositories::EventRepository;
    use crate::test_support::{draft, seed_user};

    struct Fixture {
        pool: SqlitePool,
        events: EventRepository,
        ledger: RegistrationLedger,
    }

    async fn fixture() -> Fixture {
        let pool = in_memory_pool().await.unwrap();
        seed_user(&pool, "ngo@x.org", Role::Ngo).await;
        seed_user(&pool, "v@x.org", Role::Volunteer).await;
        seed_user(&pool, "w@x.org", Role::Volunteer).await;
        Fixture {
            events: EventRepository::new(pool.clone()),
            ledger: RegistrationLedger::new(pool.clone()),
            pool,
        }
    }

    async fn rows_for(pool: &SqlitePool, event_id: EventId, email: &str) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations WHERE event_id = ? AND volunteer_email = ?",
        )
        .bind(event_id)
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn second_join_reports_already_joined() {
        let f = fixture().await;
        let id = f.events.create(&draft("Cleanup", 2025, 6, 1), "ngo@x.org").await.unwrap();

        assert_eq!(f.ledger.join(id, "v@x.org").await.unwrap(), JoinOutcome::Joined);
        assert_eq!(
            f.ledger.join(id, "V@x.org").await.unwrap(),
            JoinOutcome::AlreadyJoined
        );
        assert_eq!(rows_for(&f.pool, id, "v@x.org").await, 1);
    }

    #[tokio::test]
    async fn unjoin_is_idempotent() {
        let f = fixture().await;
        let id = f.events.create(&draft("Cleanup", 2025, 6, 1), "ngo@x.org").await.unwrap();

        f.ledger.join(id, "v@x.org").await.unwrap();
        f.ledger.unjoin(id, "v@x.org").await.unwrap();
        f.ledger.unjoin(id, "v@x.org").await.unwrap();

        assert_eq!(rows_for(&f.pool, id, "v@x.org").await, 0);
    }

    #[tokio::test]
    async fn join_missing_event_is_not_found() {
        let f = fixture().await;
        let err = f.ledger.join(99, "v@x.org").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Event 99 was not found"));
    }

    #[tokio::test]
    async fn join_by_unknown_volunteer_names_the_account() {
        let f = fixture().await;
        let id = f.events.create(&draft("Cleanup", 2025, 6, 1), "ngo@x.org").await.unwrap();

        let err = f.ledger.join(id, "ghost@x.org").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(msg) if msg.contains("ghost@x.org")));
        assert!(f.ledger.list_registrations(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn volunteers_are_listed_per_event() {
        let f = fixture().await;
        let a = f.events.create(&draft("A", 2025, 6, 1), "ngo@x.org").await.unwrap();
        let b = f.events.create(&draft("B", 2025, 6, 2), "ngo@x.org").await.unwrap();
        f.ledger.join(a, "w@x.org").await.unwrap();
        f.ledger.join(a, "v@x.org").await.unwrap();
        f.ledger.join(b, "v@x.org").await.unwrap();

        let volunteers: Vec<String> = f.ledger.list_volunteers(a).await.unwrap().into_iter().collect();
        assert_eq!(volunteers, ["v@x.org", "w@x.org"]);
        assert!(f.ledger.list_volunteers(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn joined_events_are_sorted_by_date() {
        let f = fixture().await;
        let later = f.events.create(&draft("Later", 2025, 8, 1), "ngo@x.org").await.unwrap();
        let sooner = f.events.create(&draft("Sooner", 2025, 3, 1), "ngo@x.org").await.unwrap();
        let skipped = f.events.create(&draft("Skipped", 2025, 1, 1), "ngo@x.org").await.unwrap();
        f.ledger.join(later, "v@x.org").await.unwrap();
        f.ledger.join(sooner, "v@x.org").await.unwrap();
        f.ledger.join(skipped, "w@x.org").await.unwrap();

        let ids: Vec<EventId> = f
            .ledger
            .list_joined_events("v@x.org")
            .await
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![sooner, later]);
    }

    #[tokio::test]
    async fn delete_all_for_event_only_touches_that_event() {
        let f = fixture().await;
        let a = f.events.create(&draft("A", 2025, 6, 1), "ngo@x.org").await.unwrap();
        let b = f.events.create(&draft("B", 2025, 6, 2), "ngo@x.org").await.unwrap();
        f.ledger.join(a, "v@x.org").await.unwrap();
        f.ledger.join(a, "w@x.org").await.unwrap();
        f.ledger.join(b, "v@x.org").await.unwrap();

        let mut conn = f.pool.acquire().await.unwrap();
        let removed = RegistrationLedger::delete_all_for_event(&mut conn, a).await.unwrap();
        drop(conn);

        assert_eq!(removed, 2);
        assert!(f.ledger.list_registrations(a).await.unwrap().is_empty());
        assert_eq!(f.ledger.list_registrations(b).await.unwrap().len(), 1);
    }
}
