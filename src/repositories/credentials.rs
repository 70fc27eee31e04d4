use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::models::user::{normalize_email, Credentials, NewUser, User, UserId, UserRow};
use crate::password::{hash_password, verify_against_dummy, verify_password};
use crate::repositories::is_unique_violation;
use crate::utils::error::{AppError, AppResult};

/// User identities and their password hashes.
#[derive(Clone)]
pub struct CredentialStore {
    db: SqlitePool,
}

impl CredentialStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Stores a new account. The plaintext password is hashed before it reaches the store.
    pub async fn register(&self, new_user: &NewUser) -> AppResult<UserId> {
        let email = normalize_email(&new_user.email);
        let password_hash = hash_password(new_user.password.clone()).await?;

        let res = sqlx::query(
            r#"
                INSERT INTO users (name, email, password_hash, role)
                VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&new_user.name)
        .bind(&email)
        .bind(&password_hash)
        .bind(new_user.role.as_str())
        .execute(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateEmail
            } else {
                AppError::Database(e)
            }
        })?;

        let id = res.last_insert_rowid();
        info!(user_id = id, email = %email, role = %new_user.role, "User registered");
        Ok(id)
    }

    /// Unknown email and wrong password both yield `AuthFailure`.
    pub async fn authenticate(&self, credentials: &Credentials) -> AppResult<User> {
        let Some(row) = self.find_row(&credentials.email).await? else {
            verify_against_dummy(credentials.password.clone()).await?;
            debug!("Login rejected");
            return Err(AppError::AuthFailure);
        };

        if !verify_password(credentials.password.clone(), row.password_hash.clone()).await? {
            debug!(user_id = row.id, "Login rejected");
            return Err(AppError::AuthFailure);
        }

        let user = row.into_user()?;
        info!(user_id = user.id, "User logged in");
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_row(email)
            .await?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn find_row(&self, email: &str) -> AppResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT id, name, email, password_hash, role
                FROM users
                WHERE email = ?
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }
}
