use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, middleware, web};

use memoir::auth::rate_limit::RateLimiter;
use memoir::config::Config;
use memoir::{db, errors, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = Config::from_env().map_err(std::io::Error::other)?;

    let pool = db::init_pool(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;
    db::run_migrations(&pool)
        .await
        .map_err(std::io::Error::other)?;
    db::seed_admin(&pool, &config.admin_username, &config.admin_password)
        .await
        .map_err(std::io::Error::other)?;

    std::fs::create_dir_all(&config.media.root)?;

    let limiter = RateLimiter::default();
    let bind_addr = config.bind_addr.clone();

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            config.session_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config.media.clone()))
            .app_data(web::Data::new(config.admin_site.clone()))
            .app_data(web::Data::new(limiter.clone()))
            // Static assets and uploaded media
            .service(actix_files::Files::new("/static", &config.static_root))
            .service(actix_files::Files::new(&config.media.url_prefix, &config.media.root))
            .configure(handlers::configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async { errors::not_found_page() }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
