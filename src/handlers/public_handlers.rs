use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::is_staff;
use crate::errors::{AppError, render};
use crate::i18n::{self, Language};
use crate::media::MediaConfig;
use crate::models::{slide, slideshow};
use crate::models::slideshow::{ProfileView, Slideshow, SlideshowView};
use crate::templates_structs::{Labels, ProfileTemplate, SlidesTemplate};

#[derive(Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
    pub autoplay: Option<String>,
}

impl LangQuery {
    pub fn wants_autoplay(&self) -> bool {
        self.autoplay.as_deref() == Some("true")
    }
}

/// Legacy URLs carry the language in the path.
#[derive(Deserialize)]
pub struct ForcedLangPath {
    pub slug: String,
    pub lang: String,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/slideshows/{slug}/", web::get().to(profile))
        .route("/slideshows/{slug}/show/", web::get().to(slides))
        .route("/slideshows/{slug}/show/{lang:(en|fa)}/", web::get().to(slides_forced))
        .route("/slideshows/{slug}/{lang:(en|fa)}/", web::get().to(profile_forced));
}

/// Resolve a slug to a slideshow this visitor may see.
/// Private slideshows only exist for signed-in staff.
pub async fn find_visible(pool: &PgPool, session: &Session, slug: &str) -> Result<Slideshow, AppError> {
    let show = slideshow::find_by_slug(pool, slug)
        .await?
        .ok_or(AppError::NotFound)?;
    if !show.is_public && !is_staff(session) {
        return Err(AppError::NotFound);
    }
    Ok(show)
}

/// Count a page view. A slideshow deleted since it was loaded is logged, not shown to the visitor.
async fn record_visit(pool: &PgPool, show: &mut Slideshow) -> Result<(), AppError> {
    match slideshow::increment_visit_count(pool, show.id).await {
        Ok(count) => {
            show.visit_count = count;
            Ok(())
        }
        Err(AppError::Consistency(msg)) => {
            log::warn!("Visit not recorded for '{}': {msg}", show.slug);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

async fn render_profile(
    pool: &PgPool,
    session: &Session,
    media: &MediaConfig,
    slug: &str,
    explicit: Option<&str>,
) -> Result<HttpResponse, AppError> {
    let mut show = find_visible(pool, session, slug).await?;
    let lang = i18n::resolve_language(session, explicit);
    record_visit(pool, &mut show).await?;

    let tmpl = ProfileTemplate {
        view: ProfileView::build(&show, lang, media),
        labels: Labels::for_lang(lang),
    };
    render(tmpl)
}

async fn render_slides(
    pool: &PgPool,
    session: &Session,
    media: &MediaConfig,
    slug: &str,
    explicit: Option<&str>,
    autoplay: bool,
) -> Result<HttpResponse, AppError> {
    let mut show = find_visible(pool, session, slug).await?;
    let lang = i18n::resolve_language(session, explicit);
    let slides = slide::find_for_slideshow(pool, show.id).await?;
    record_visit(pool, &mut show).await?;

    let tmpl = SlidesTemplate {
        view: SlideshowView::build(&show, &slides, lang, media),
        labels: Labels::for_lang(lang),
        autoplay,
    };
    render(tmpl)
}

pub async fn profile(
    pool: web::Data<PgPool>,
    media: web::Data<MediaConfig>,
    session: Session,
    path: web::Path<String>,
    query: web::Query<LangQuery>,
) -> Result<HttpResponse, AppError> {
    render_profile(&pool, &session, &media, &path, query.lang.as_deref()).await
}

pub async fn slides(
    pool: web::Data<PgPool>,
    media: web::Data<MediaConfig>,
    session: Session,
    path: web::Path<String>,
    query: web::Query<LangQuery>,
) -> Result<HttpResponse, AppError> {
    render_slides(&pool, &session, &media, &path, query.lang.as_deref(), query.wants_autoplay()).await
}

pub async fn profile_forced(
    pool: web::Data<PgPool>,
    media: web::Data<MediaConfig>,
    session: Session,
    path: web::Path<ForcedLangPath>,
) -> Result<HttpResponse, AppError> {
    let lang: Language = path.lang.parse().unwrap_or_default();
    render_profile(&pool, &session, &media, &path.slug, Some(lang.code())).await
}

pub async fn slides_forced(
    pool: web::Data<PgPool>,
    media: web::Data<MediaConfig>,
    session: Session,
    path: web::Path<ForcedLangPath>,
    query: web::Query<LangQuery>,
) -> Result<HttpResponse, AppError> {
    let lang: Language = path.lang.parse().unwrap_or_default();
    render_slides(&pool, &session, &media, &path.slug, Some(lang.code()), query.wants_autoplay()).await
}
