use chrono::{DateTime, Utc};

/// Internal user struct for authentication, includes the password hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: String,
    pub is_staff: bool,
    pub is_customer: bool,
    pub date_joined: DateTime<Utc>,
}

/// Owner choice for the slideshow form, no credentials.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserOption {
    pub id: i64,
    pub username: String,
}

/// New user data for creation. `password` is already hashed.
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub is_staff: bool,
    pub is_customer: bool,
}
