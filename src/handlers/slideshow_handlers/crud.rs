use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::{csrf, validate};
use crate::config::AdminSite;
use crate::errors::{AppError, render};
use crate::handlers::admin_handlers::redirect_with_flash;
use crate::handlers::auth_handlers::CsrfOnly;
use crate::i18n::Localized;
use crate::media::{self, MediaConfig};
use crate::models::{slide, slideshow, user};
use crate::models::slideshow::{NewSlideshow, Slideshow, SlideshowForm, SlideshowUpdate, Theme};
use crate::templates_structs::{AdminContext, SlideshowFields, SlideshowFormTemplate};

const TITLE_MAX: usize = 200;

/// Validate the submitted form. Media references stay raw until the slug is known.
async fn parse_form(pool: &PgPool, form: &SlideshowForm) -> Result<NewSlideshow, Vec<String>> {
    let mut errors: Vec<String> = vec![];
    errors.extend(validate::validate_required(&form.title, "Title", TITLE_MAX));
    errors.extend(validate::validate_optional(&form.title_fa, "Title (Farsi)", TITLE_MAX));

    let owner_id = match validate::parse_id(&form.owner_id, "Owner") {
        Ok(id) => match user::exists(pool, id).await {
            Ok(true) => Some(id),
            Ok(false) => {
                errors.push("Select a valid owner".to_string());
                None
            }
            Err(e) => {
                log::error!("Owner lookup failed: {e}");
                errors.push("Select a valid owner".to_string());
                None
            }
        },
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let mut date = |value: &str, name: &str| match validate::parse_optional_date(value, name) {
        Ok(d) => d,
        Err(e) => {
            errors.push(e);
            None
        }
    };
    let date_of_birth = date(&form.date_of_birth, "Date of birth");
    let date_of_death = date(&form.date_of_death, "Date of death");

    let mut theme = |value: &str| {
        if value.trim().is_empty() {
            return Theme::default();
        }
        value.parse::<Theme>().unwrap_or_else(|e| {
            errors.push(e);
            Theme::default()
        })
    };
    let profile_theme = theme(&form.profile_theme);
    let slide_theme = theme(&form.slide_theme);

    let raw = |value: &str| Some(value.trim().to_string()).filter(|v| !v.is_empty());

    match owner_id {
        Some(owner_id) if errors.is_empty() => Ok(NewSlideshow {
            owner_id,
            title: Localized::new(form.title.trim().to_string(), form.title_fa.trim().to_string()),
            date_of_birth,
            date_of_death,
            description: Localized::new(form.description.clone(), form.description_fa.clone()),
            main_image: raw(&form.main_image),
            music: raw(&form.music),
            profile_theme,
            slide_theme,
            is_public: form.is_public.is_some(),
        }),
        _ => Err(errors),
    }
}

struct FormPage<'a> {
    action: String,
    title: String,
    existing: Option<Slideshow>,
    fields: SlideshowFields,
    errors: Vec<String>,
    site: &'a AdminSite,
    media: &'a MediaConfig,
}

async fn render_form(pool: &PgPool, session: &Session, page: FormPage<'_>) -> Result<HttpResponse, AppError> {
    let ctx = AdminContext::build(session, page.site, "/admin/slideshows");
    let owners = user::find_options(pool).await?;
    let slides = match &page.existing {
        Some(show) => slide::find_for_slideshow(pool, show.id).await?,
        None => vec![],
    };

    let tmpl = SlideshowFormTemplate {
        ctx,
        form_action: page.action,
        form_title: page.title,
        fields: page.fields,
        existing: page.existing,
        slides,
        owners,
        themes: Theme::ALL,
        media_url: page.media.url_prefix.clone(),
        errors: page.errors,
    };
    render(tmpl)
}

pub async fn new_form(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<AdminSite>,
    media: web::Data<MediaConfig>,
) -> Result<HttpResponse, AppError> {
    render_form(&pool, &session, FormPage {
        action: "/admin/slideshows".to_string(),
        title: "Add slideshow".to_string(),
        existing: None,
        fields: SlideshowFields::default(),
        errors: vec![],
        site: &site,
        media: &media,
    })
    .await
}

pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<AdminSite>,
    media: web::Data<MediaConfig>,
    form: web::Form<SlideshowForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let rejected = |errors: Vec<String>| FormPage {
        action: "/admin/slideshows".to_string(),
        title: "Add slideshow".to_string(),
        existing: None,
        fields: SlideshowFields::from(&*form),
        errors,
        site: &site,
        media: &media,
    };

    let new = match parse_form(&pool, &form).await {
        Ok(new) => new,
        Err(errors) => return render_form(&pool, &session, rejected(errors)).await,
    };

    match slideshow::create(&pool, &new).await {
        Ok(created) => Ok(redirect_with_flash(
            &session,
            &format!("/admin/slideshows/{}/edit", created.id),
            format!("The slideshow \"{}\" was added successfully.", created.title.en),
        )),
        Err(AppError::Validation(msg)) => render_form(&pool, &session, rejected(vec![msg])).await,
        Err(e) => Err(e),
    }
}

pub async fn edit_form(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<AdminSite>,
    media: web::Data<MediaConfig>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let show = slideshow::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;

    render_form(&pool, &session, FormPage {
        action: format!("/admin/slideshows/{id}"),
        title: format!("Change slideshow: {}", show.title.en),
        fields: SlideshowFields::from(&show),
        existing: Some(show),
        errors: vec![],
        site: &site,
        media: &media,
    })
    .await
}

pub async fn update(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<AdminSite>,
    media: web::Data<MediaConfig>,
    path: web::Path<i64>,
    form: web::Form<SlideshowForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let show = slideshow::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;

    let parsed = parse_form(&pool, &form).await.and_then(|new| {
        let normalize = |r: Option<&str>| match r {
            Some(r) => media::normalize_reference(&show.slug, r),
            None => Ok(None),
        };
        let main_image = normalize(new.main_image.as_deref()).map_err(|e| vec![e.to_string()])?;
        let music = normalize(new.music.as_deref()).map_err(|e| vec![e.to_string()])?;
        Ok(SlideshowUpdate {
            owner_id: new.owner_id,
            title: new.title,
            date_of_birth: new.date_of_birth,
            date_of_death: new.date_of_death,
            description: new.description,
            main_image,
            music,
            profile_theme: new.profile_theme,
            slide_theme: new.slide_theme,
            is_public: new.is_public,
        })
    });

    let upd = match parsed {
        Ok(upd) => upd,
        Err(errors) => {
            return render_form(&pool, &session, FormPage {
                action: format!("/admin/slideshows/{id}"),
                title: format!("Change slideshow: {}", show.title.en),
                fields: SlideshowFields::from(&*form),
                existing: Some(show),
                errors,
                site: &site,
                media: &media,
            })
            .await;
        }
    };

    if !slideshow::update(&pool, id, &upd).await? {
        return Err(AppError::NotFound);
    }
    Ok(redirect_with_flash(
        &session,
        "/admin/slideshows",
        format!("The slideshow \"{}\" was changed successfully.", upd.title.en),
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
    let show = slideshow::find_by_id(&pool, id).await?.ok_or(AppError::NotFound)?;
    slideshow::delete(&pool, id).await?;
    log::info!("Deleted slideshow {id} ('{}')", show.slug);

    Ok(redirect_with_flash(
        &session,
        "/admin/slideshows",
        format!("The slideshow \"{}\" was deleted successfully.", show.title.en),
    ))
}
