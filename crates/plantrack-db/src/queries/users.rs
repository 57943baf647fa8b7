//! Database query functions for the `users` table.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::User;

/// Insert a new user row. Returns the inserted user with server-generated
/// defaults (id, created_at). Fails if the username is already taken.
pub async fn insert_user(pool: &PgPool, username: &str, is_superuser: bool) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, is_superuser) \
         VALUES ($1, $2) \
         RETURNING *",
    )
    .bind(username)
    .bind(is_superuser)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to insert user {username:?}"))?;

    Ok(user)
}

/// Fetch a user by ID.
pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch user")?;

    Ok(user)
}

/// Fetch a user by username.
pub async fn get_user_by_username(pool: &PgPool, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("failed to fetch user by username")?;

    Ok(user)
}

/// List all users, sorted by username.
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY username ASC")
        .fetch_all(pool)
        .await
        .context("failed to list users")?;

    Ok(users)
}

/// Count all users.
pub async fn count_users(pool: &PgPool) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .context("failed to count users")?;

    Ok(row.0)
}
