use std::net::{IpAddr, Ipv4Addr};

use actix_session::Session;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::{csrf, password, rate_limit::RateLimiter, session};
use crate::config::AdminSite;
use crate::errors::{AppError, render};
use crate::models::user;
use crate::templates_structs::LoginTemplate;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn login_error(session: &Session, site: &AdminSite, msg: &str) -> Result<HttpResponse, AppError> {
    let tmpl = LoginTemplate {
        site: site.clone(),
        error: Some(msg.to_string()),
        csrf_token: csrf::get_or_create_token(session),
    };
    render(tmpl)
}

pub async fn login_page(
    session: Session,
    site: web::Data<AdminSite>,
) -> Result<HttpResponse, AppError> {
    if session::is_staff(&session) {
        return Ok(HttpResponse::SeeOther()
            .insert_header(("Location", "/admin/"))
            .finish());
    }

    let tmpl = LoginTemplate {
        site: site.get_ref().clone(),
        error: None,
        csrf_token: csrf::get_or_create_token(&session),
    };
    render(tmpl)
}

pub async fn login_submit(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<AdminSite>,
    form: web::Form<LoginForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // Rate-limit check BEFORE any database access
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if limiter.is_blocked(ip) {
        return login_error(&session, &site, "Too many failed login attempts. Please try again later.");
    }

    let found = user::find_by_username(&pool, form.username.trim()).await?;

    match found {
        Some(u) if u.is_staff && password::verify_password(&form.password, &u.password) => {
            limiter.clear(ip);
            session::sign_in(&session, u.id, &u.username)?;
            log::info!("Staff user '{}' signed in", u.username);
            Ok(HttpResponse::SeeOther()
                .insert_header(("Location", "/admin/"))
                .finish())
        }
        _ => {
            limiter.record_failure(ip);
            login_error(
                &session,
                &site,
                "Please enter the correct username and password for a staff account.",
            )
        }
    }
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session::sign_out(&session);
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", "/admin/login"))
        .finish())
}
