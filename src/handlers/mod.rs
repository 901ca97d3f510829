use actix_web::{middleware, web};

use crate::auth;

pub mod admin_handlers;
pub mod api_handlers;
pub mod auth_handlers;
pub mod public_handlers;
pub mod slide_handlers;
pub mod slideshow_handlers;

/// Every dynamic route: public pages, the JSON API and the admin console.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(public_handlers::configure)
        .route("/api/v1/slideshows/{slug}", web::get().to(api_handlers::slideshow))
        // Admin console: login is open, everything else needs a staff session
        .service(
            web::scope("/admin")
                .route("/login", web::get().to(auth_handlers::login_page))
                .route("/login", web::post().to(auth_handlers::login_submit))
                .service(
                    web::scope("")
                        .wrap(middleware::from_fn(auth::middleware::require_staff))
                        .configure(admin_handlers::configure),
                ),
        );
}
