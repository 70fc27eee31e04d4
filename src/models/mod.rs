pub mod event;
pub mod registration;
pub mod user;

pub use event::{Event, EventDraft, EventId, EventSummary};
pub use registration::{JoinOutcome, Registration};
pub use user::{normalize_email, Actor, Credentials, NewUser, Role, User, UserId};
