use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::error::{AppError, AppResult};

pub type EventId = i64;

/// Dates are stored as `YYYY-MM-DD` text; only four-digit years keep text order
/// equal to calendar order.
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    /// Email of the NGO account that owns the event.
    pub created_by: String,
}

/// The mutable fields of an event, as submitted by its organiser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
}

impl EventDraft {
    pub fn validated(self) -> AppResult<Self> {
        Ok(Self {
            title: required("Title", &self.title)?,
            description: required("Description", &self.description)?,
            location: required("Location", &self.location)?,
            date: storable_date(self.date)?,
        })
    }
}

fn storable_date(date: NaiveDate) -> AppResult<NaiveDate> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        return Err(AppError::Validation(format!(
            "Date {} is out of range (years {}-{})",
            date, MIN_YEAR, MAX_YEAR
        )));
    }
    Ok(date)
}

fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// An organiser's event together with how many volunteers joined it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct EventSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub event: Event,
    pub registrant_count: i64,
}
