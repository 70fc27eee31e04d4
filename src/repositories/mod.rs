pub mod credentials;
pub mod events;
pub mod registrations;

pub use credentials::CredentialStore;
pub use events::EventRepository;
pub use registrations::RegistrationLedger;

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
