//! Shared test infrastructure for the database-backed tests.
//!
//! Every test gets its own Postgres schema on the server named by
//! `DATABASE_URL`, with the migrations applied. Without `DATABASE_URL` the
//! setup returns `None` and the test returns early.

#![allow(dead_code)]

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use memoir::auth::password;
use memoir::i18n::Localized;
use memoir::models::slide::{self, MediaType, Slide, SlideInput};
use memoir::models::slideshow::{self, NewSlideshow, Slideshow, Theme};
use memoir::models::user::{self, NewUser};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "admin123";

// ============================================================================
// DATABASE SETUP
// ============================================================================

pub struct TestDb {
    pool: PgPool,
    pub schema: String,
}

impl TestDb {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Fresh schema with migrations applied, or `None` when no database is configured.
pub async fn setup_test_db() -> Option<TestDb> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };

    let schema = format!("test_{}", hex::encode(rand::random::<[u8; 8]>()));

    let admin = PgPool::connect(&url).await.expect("connect to DATABASE_URL");
    sqlx::query(&format!("CREATE SCHEMA {schema}"))
        .execute(&admin)
        .await
        .expect("create test schema");
    admin.close().await;

    let search_path = schema.clone();
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .after_connect(move |conn, _meta| {
            let sql = format!("SET search_path TO {search_path}");
            Box::pin(async move {
                sqlx::query(&sql).execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(&url)
        .await
        .expect("connect test pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    Some(TestDb { pool, schema })
}

// ============================================================================
// FIXTURES
// ============================================================================

/// Insert a user and return its id.
pub async fn insert_user(pool: &PgPool, username: &str, is_staff: bool) -> i64 {
    let new = NewUser {
        username: username.to_string(),
        password: password::hash_password(ADMIN_PASS).expect("hash"),
        email: format!("{username}@example.com"),
        is_staff,
        is_customer: !is_staff,
    };
    user::create(pool, &new).await.expect("create user")
}

pub fn new_slideshow(owner_id: i64, title: &str) -> NewSlideshow {
    NewSlideshow {
        owner_id,
        title: Localized::new(title.to_string(), format!("{title} (fa)")),
        date_of_birth: chrono::NaiveDate::from_ymd_opt(1950, 6, 1),
        date_of_death: chrono::NaiveDate::from_ymd_opt(2024, 3, 20),
        description: Localized::new("A life well lived".to_string(), "زندگی".to_string()),
        main_image: Some("portrait.jpg".to_string()),
        music: None,
        profile_theme: Theme::Classic,
        slide_theme: Theme::Serene,
        is_public: true,
    }
}

pub async fn insert_slideshow(pool: &PgPool, owner_id: i64, title: &str) -> Slideshow {
    slideshow::create(pool, &new_slideshow(owner_id, title))
        .await
        .expect("create slideshow")
}

/// Insert a slide with an explicit order and a caption naming it.
pub async fn insert_slide(pool: &PgPool, slideshow_id: i64, order: i32, caption: &str) -> Slide {
    let input = SlideInput {
        slideshow_id,
        media_type: MediaType::Image,
        media_file: format!("slideshows/test/{caption}.jpg"),
        caption: Localized::new(caption.to_string(), format!("{caption} fa")),
        order: Some(order),
    };
    slide::create(pool, &input).await.expect("create slide")
}

/// Captions of a slideshow's slides in display order.
pub async fn captions_in_order(pool: &PgPool, slideshow_id: i64) -> Vec<String> {
    slide::find_for_slideshow(pool, slideshow_id)
        .await
        .expect("load slides")
        .into_iter()
        .map(|s| s.caption.en)
        .collect()
}

// ============================================================================
// HTTP SETUP
// ============================================================================

/// The application's routes over `pool`, as an actix test service.
#[allow(unused_macros)]
macro_rules! init_app {
    ($pool:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(
                    actix_session::SessionMiddleware::builder(
                        actix_session::storage::CookieSessionStore::default(),
                        actix_web::cookie::Key::generate(),
                    )
                    .cookie_secure(false)
                    .build(),
                )
                .app_data(actix_web::web::Data::new($pool.clone()))
                .app_data(actix_web::web::Data::new(memoir::media::MediaConfig::default()))
                .app_data(actix_web::web::Data::new(memoir::config::AdminSite::default()))
                .app_data(actix_web::web::Data::new(memoir::auth::rate_limit::RateLimiter::default()))
                .configure(memoir::handlers::configure)
                .default_service(actix_web::web::to(|| async { memoir::errors::not_found_page() })),
        )
        .await
    };
}

/// The session cookie set by `resp`, if it set one.
pub fn session_cookie<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Option<actix_web::cookie::Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "id")
        .map(|c| c.into_owned())
}

/// CSRF token embedded in a rendered form.
pub fn csrf_token(html: &str) -> String {
    let re = regex::Regex::new(r#"name="csrf_token" value="([0-9a-f]{64})""#).expect("regex");
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .expect("csrf token in page")
}
