use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::models::{EventDraft, Role};

/// Inserts a user row directly. The hash is not a valid PHC string, so these
/// accounts cannot log in; use `CredentialStore::register` when that matters.
pub(crate) async fn seed_user(pool: &SqlitePool, email: &str, role: Role) {
    sqlx::query("INSERT INTO users (name, email, password_hash, role) VALUES (?, ?, 'x', ?)")
        .bind(email)
        .bind(email)
        .bind(role.as_str())
        .execute(pool)
        .await
        .unwrap();
}

pub(crate) fn draft(title: &str, year: i32, month: u32, day: u32) -> EventDraft {
    EventDraft {
        title: title.to_string(),
        description: format!("{} description", title),
        location: "Community hall".to_string(),
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
    }
}
