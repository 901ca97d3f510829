use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::password;
use crate::errors::AppError;
use crate::models::user::{self, NewUser};

pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Create the bootstrap staff account on an empty database.
/// Returns true when a user was created.
pub async fn seed_admin(pool: &PgPool, username: &str, plain_password: &str) -> Result<bool, AppError> {
    if user::count(pool).await? > 0 {
        return Ok(false);
    }
    let new = NewUser {
        username: username.to_string(),
        password: password::hash_password(plain_password)?,
        email: String::new(),
        is_staff: true,
        is_customer: false,
    };
    let id = user::create(pool, &new).await?;
    log::info!("Seeded staff user '{username}' (id {id})");
    Ok(true)
}
