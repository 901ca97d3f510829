use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::{csrf, validate};
use crate::config::AdminSite;
use crate::errors::{AppError, render};
use crate::handlers::admin_handlers::redirect_with_flash;
use crate::handlers::auth_handlers::CsrfOnly;
use crate::i18n::Localized;
use crate::media::{self, MediaConfig};
use crate::models::{slide, slideshow};
use crate::models::slide::{MediaType, SlideForm, SlideInput};
use crate::templates_structs::{AdminContext, SlideFields, SlideFormTemplate};

#[derive(Deserialize)]
pub struct NewSlideQuery {
    slideshow: Option<i64>,
}

/// Validate the submitted form against the target slideshow.
async fn parse_form(pool: &PgPool, form: &SlideForm) -> Result<SlideInput, Vec<String>> {
    let mut errors: Vec<String> = vec![];

    let show = match validate::parse_id(&form.slideshow_id, "Slideshow") {
        Ok(id) => match slideshow::find_by_id(pool, id).await {
            Ok(Some(show)) => Some(show),
            Ok(None) => {
                errors.push("Select a valid slideshow".to_string());
                None
            }
            Err(e) => {
                log::error!("Slideshow lookup failed: {e}");
                errors.push("Select a valid slideshow".to_string());
                None
            }
        },
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let media_type = if form.media_type.trim().is_empty() {
        MediaType::default()
    } else {
        form.media_type.parse::<MediaType>().unwrap_or_else(|e| {
            errors.push(e);
            MediaType::default()
        })
    };

    let order = validate::parse_optional_order(&form.order).unwrap_or_else(|e| {
        errors.push(e);
        None
    });

    let media_file = match &show {
        Some(show) => match media::normalize_reference(&show.slug, &form.media_file) {
            Ok(Some(path)) => Some(path),
            Ok(None) => {
                errors.push("Media file is required".to_string());
                None
            }
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        },
        None => None,
    };

    match (show, media_file) {
        (Some(show), Some(media_file)) if errors.is_empty() => Ok(SlideInput {
            slideshow_id: show.id,
            media_type,
            media_file,
            caption: Localized::new(form.caption.trim().to_string(), form.caption_fa.trim().to_string()),
            order,
        }),
        _ => Err(errors),
    }
}

#[allow(clippy::too_many_arguments)]
async fn render_form(
    pool: &PgPool,
    session: &Session,
    site: &AdminSite,
    media: &MediaConfig,
    action: String,
    title: String,
    fields: SlideFields,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = AdminContext::build(session, site, "/admin/slides");
    let slideshows = slideshow::find_choices(pool).await?;

    let tmpl = SlideFormTemplate {
        ctx,
        form_action: action,
        form_title: title,
        fields,
        slideshows,
        media_types: MediaType::ALL,
        media_url: media.url_prefix.clone(),
        errors,
    };
    render(tmpl)
}

fn list_url(slideshow_id: i64) -> String {
    format!("/admin/slides?slideshow={slideshow_id}")
}

pub async fn new_form(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<AdminSite>,
    media: web::Data<MediaConfig>,
    query: web::Query<NewSlideQuery>,
) -> Result<HttpResponse, AppError> {
    let fields = SlideFields {
        slideshow_id: query.slideshow.map(|id| id.to_string()).unwrap_or_default(),
        media_type: MediaType::default().as_str().to_string(),
        ..SlideFields::default()
    };
    render_form(
        &pool,
        &session,
        &site,
        &media,
        "/admin/slides".to_string(),
        "Add slide".to_string(),
        fields,
        vec![],
    )
    .await
}

pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<AdminSite>,
    media: web::Data<MediaConfig>,
    form: web::Form<SlideForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let input = match parse_form(&pool, &form).await {
        Ok(input) => input,
        Err(errors) => {
            return render_form(
                &pool,
                &session,
                &site,
                &media,
                "/admin/slides".to_string(),
                "Add slide".to_string(),
                SlideFields::from(&*form),
                errors,
            )
            .await;
        }
    };

    let created = slide::create(&pool, &input).await?;
    Ok(redirect_with_flash(
        &session,
        &list_url(created.slideshow_id),
        format!("The slide \"{created}\" was added successfully."),
    ))
}

pub async fn edit_form(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<AdminSite>,
    media: web::Data<MediaConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let existing = slide::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;

    render_form(
        &pool,
        &session,
        &site,
        &media,
        format!("/admin/slides/{id}"),
        format!("Change slide: {existing}"),
        SlideFields::from(&existing),
        vec![],
    )
    .await
}

pub async fn update(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<AdminSite>,
    media: web::Data<MediaConfig>,
    path: web::Path<i64>,
    form: web::Form<SlideForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let existing = slide::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;

    let input = match parse_form(&pool, &form).await {
        Ok(input) => input,
        Err(errors) => {
            return render_form(
                &pool,
                &session,
                &site,
                &media,
                format!("/admin/slides/{id}"),
                format!("Change slide: {existing}"),
                SlideFields::from(&*form),
                errors,
            )
            .await;
        }
    };

    if !slide::update(&pool, id, &input).await? {
        return Err(AppError::NotFound);
    }
    Ok(redirect_with_flash(
        &session,
        &list_url(input.slideshow_id),
        format!("The slide \"{existing}\" was changed successfully."),
    ))
}

pub async fn delete(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let existing = slide::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    slide::delete(&pool, id).await?;

    Ok(redirect_with_flash(
        &session,
        &list_url(existing.slideshow_id),
        format!("The slide \"{existing}\" was deleted successfully."),
    ))
}
