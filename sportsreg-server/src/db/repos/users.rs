//! User repository
//!
//! - create: INSERT with ON CONFLICT (email) DO NOTHING, `None` on duplicate
//! - password hashes never leave this module except through `find_credentials`

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool, Row};

use super::DbError;
use crate::models::{Email, Role};

/// Public user record (no password)
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new account. Returns `None` if the email is taken.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        phone: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, phone, password, role)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, name, email, phone, role, created_at
            "#,
        )
        .bind(name)
        .bind(email.as_str())
        .bind(phone)
        .bind(password_hash)
        .bind(role)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Look up a user and their stored password hash by email.
    pub async fn find_credentials(&self, email: &Email) -> Result<Option<(User, String)>, DbError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, phone, role, created_at, password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| -> Result<(User, String), DbError> {
            let user = User::from_row(&r)?;
            let password: String = r.try_get("password")?;
            Ok((user, password))
        })
        .transpose()
    }

    pub async fn get(&self, id: i64) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "User",
            id: id.to_string(),
        })
    }

    /// All users, newest first.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, phone, role, created_at
            FROM users
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }
}
