use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::error::{AppError, AppResult};

pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(alias = "Volunteer")]
    Volunteer,
    #[serde(alias = "NGO")]
    Ngo,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Volunteer => "volunteer",
            Role::Ngo => "ngo",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "volunteer" => Ok(Role::Volunteer),
            "ngo" => Ok(Role::Ngo),
            other => Err(AppError::Validation(format!("Unknown role '{}'", other))),
        }
    }
}

/// A registered account, without its password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl UserRow {
    pub(crate) fn into_user(self) -> AppResult<User> {
        Ok(User {
            id: self.id,
            name: self.name,
            email: self.email,
            role: self.role.parse()?,
        })
    }
}

/// Identity of the caller, supplied explicitly to every domain operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl NewUser {
    /// Trims the inputs, normalizes the email and rejects empty fields.
    pub fn validated(self) -> AppResult<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".into()));
        }
        if self.password.is_empty() {
            return Err(AppError::Validation("Password is required".into()));
        }
        Ok(Self {
            name,
            email: validated_email(&self.email)?,
            password: self.password,
            role: self.role,
        })
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Emails are compared case-insensitively: stored and looked up trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn validated_email(email: &str) -> AppResult<String> {
    let email = normalize_email(email);
    if email.is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AppError::Validation(format!(
            "'{}' is not a valid email address",
            email
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_accepts_both_spellings() {
        let role: Role = serde_json::from_str("\"NGO\"").unwrap();
        assert_eq!(role, Role::Ngo);
        let role: Role = serde_json::from_str("\"volunteer\"").unwrap();
        assert_eq!(role, Role::Volunteer);
        assert_eq!("Ngo".parse::<Role>().unwrap(), Role::Ngo);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Ngo@X.org "), "ngo@x.org");
        assert!(validated_email("nobody").is_err());
        assert!(validated_email("@x.org").is_err());
        assert!(validated_email("   ").is_err());
    }

    #[test]
    fn new_user_debug_hides_password() {
        let new_user = NewUser {
            name: "Ana".into(),
            email: "ana@x.org".into(),
            password: "hunter2".into(),
            role: Role::Volunteer,
        };
        let rendered = format!("{:?}", new_user);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn new_user_requires_every_field() {
        let blank_name = NewUser {
            name: " ".into(),
            email: "ana@x.org".into(),
            password: "pw".into(),
            role: Role::Volunteer,
        };
        assert!(matches!(blank_name.validated(), Err(AppError::Validation(_))));

        let ok = NewUser {
            name: " Ana ".into(),
            email: "Ana@X.org".into(),
            password: "pw".into(),
            role: Role::Ngo,
        }
        .validated()
        .unwrap();
        assert_eq!(ok.name, "Ana");
        assert_eq!(ok.email, "ana@x.org");
    }
}
