use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::config::AdminSite;
use crate::errors::{AppError, render};
use crate::models::{slide, slideshow};
use crate::models::slide::SlideFilter;
use crate::models::slideshow::SlideshowFilter;
use crate::templates_structs::{AdminContext, AdminIndexTemplate};
use super::{auth_handlers, slide_handlers, slideshow_handlers};

/// Routes behind the staff guard, relative to `/admin`.
/// `/new` and `/actions` come before `/{id}` to avoid routing conflicts.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/logout", web::post().to(auth_handlers::logout))
        // Slideshows
        .route("/slideshows", web::get().to(slideshow_handlers::list::list))
        .route("/slideshows", web::post().to(slideshow_handlers::crud::create))
        .route("/slideshows/new", web::get().to(slideshow_handlers::crud::new_form))
        .route("/slideshows/actions", web::post().to(slideshow_handlers::actions::run))
        .route("/slideshows/{id}/edit", web::get().to(slideshow_handlers::crud::edit_form))
        .route("/slideshows/{id}", web::post().to(slideshow_handlers::crud::update))
        .route("/slideshows/{id}/delete", web::post().to(slideshow_handlers::crud::delete))
        // Slides
        .route("/slides", web::get().to(slide_handlers::list::list))
        .route("/slides", web::post().to(slide_handlers::crud::create))
        .route("/slides/new", web::get().to(slide_handlers::crud::new_form))
        .route("/slides/actions", web::post().to(slide_handlers::actions::run))
        .route("/slides/{id}/edit", web::get().to(slide_handlers::crud::edit_form))
        .route("/slides/{id}", web::post().to(slide_handlers::crud::update))
        .route("/slides/{id}/delete", web::post().to(slide_handlers::crud::delete));
}

pub async fn index(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<AdminSite>,
) -> Result<HttpResponse, AppError> {
    let ctx = AdminContext::build(&session, &site, "/admin/");
    let recent = slideshow::find_paginated(&pool, 1, 5, &SlideshowFilter::default()).await?;
    let slides = slide::find_paginated(&pool, 1, 1, &SlideFilter::default()).await?;

    let tmpl = AdminIndexTemplate {
        ctx,
        slideshow_count: recent.total_count,
        slide_count: slides.total_count,
        recent: recent.items,
    };
    render(tmpl)
}

/// A submitted bulk action: which action, on which rows.
///
/// Checkbox lists arrive as repeated `ids` keys, so the form is read as raw pairs.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ActionForm {
    pub action: String,
    pub csrf_token: String,
    pub ids: Vec<i64>,
}

impl ActionForm {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = ActionForm::default();
        for (key, value) in pairs {
            match key.as_str() {
                "action" => form.action = value,
                "csrf_token" => form.csrf_token = value,
                "ids" => {
                    if let Ok(id) = value.trim().parse::<i64>() {
                        if !form.ids.contains(&id) {
                            form.ids.push(id);
                        }
                    }
                }
                _ => {}
            }
        }
        form
    }
}

/// Redirect with a flash message, the usual end of an admin POST.
pub fn redirect_with_flash(session: &Session, location: &str, msg: impl AsRef<str>) -> HttpResponse {
    crate::auth::session::set_flash(session, msg);
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

/// Query string of the non-empty `pairs`, for pagination links.
pub fn filter_query(pairs: &[(&str, &str)]) -> String {
    let kept: Vec<(&str, &str)> = pairs
        .iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .copied()
        .collect();
    serde_urlencoded::to_string(kept).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn action_form_collects_repeated_ids() {
        let form = ActionForm::from_pairs(pairs(&[
            ("csrf_token", "tok"),
            ("action", "make_public"),
            ("ids", "3"),
            ("ids", "1"),
            ("ids", "3"),
            ("ids", "junk"),
        ]));
        assert_eq!(form.action, "make_public");
        assert_eq!(form.csrf_token, "tok");
        assert_eq!(form.ids, vec![3, 1]);
    }

    #[test]
    fn filter_query_skips_empty_values() {
        assert_eq!(filter_query(&[("q", "jane doe"), ("public", ""), ("theme", "serene")]), "q=jane+doe&theme=serene");
        assert_eq!(filter_query(&[("q", " ")]), "");
    }
}
