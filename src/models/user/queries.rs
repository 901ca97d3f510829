use sqlx::PgPool;

use super::types::{NewUser, User, UserOption};

/// Find user by username for authentication. Returns the row with its password hash.
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password, email, is_staff, is_customer, date_joined \
         FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// All users, for the owner dropdown.
pub async fn find_options(pool: &PgPool) -> Result<Vec<UserOption>, sqlx::Error> {
    sqlx::query_as::<_, UserOption>("SELECT id, username FROM users ORDER BY username")
        .fetch_all(pool)
        .await
}

pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
}

/// Create a new user, returning its id.
pub async fn create(pool: &PgPool, new: &NewUser) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO users (username, password, email, is_staff, is_customer) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(new.username.trim())
    .bind(&new.password)
    .bind(new.email.trim())
    .bind(new.is_staff)
    .bind(new.is_customer)
    .fetch_one(pool)
    .await
}
