use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::config::AdminSite;
use crate::errors::{AppError, render};
use crate::handlers::admin_handlers::filter_query;
use crate::models::{slide, slideshow};
use crate::models::slide::{MediaType, SlideFilter};
use crate::templates_structs::{AdminContext, SlideListQuery, SlideListTemplate};

const PER_PAGE: i64 = 50;

#[derive(Deserialize)]
pub struct ListQuery {
    page: Option<i64>,
    #[serde(default)]
    slideshow: String,
    #[serde(default)]
    media_type: String,
    #[serde(default)]
    q: String,
}

impl ListQuery {
    fn filter(&self) -> SlideFilter {
        SlideFilter {
            slideshow_id: self.slideshow.parse().ok(),
            media_type: self.media_type.parse().ok(),
            search: Some(self.q.clone()).filter(|q| !q.trim().is_empty()),
        }
    }
}

/// Without filters the slides are shown grouped under their slideshow;
/// any filter switches to the flat paginated list.
pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<AdminSite>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let ctx = AdminContext::build(&session, &site, "/admin/slides");
    let filter = query.filter();

    let (page, groups) = if filter.is_empty() {
        (None, slide::find_groups(&pool).await?)
    } else {
        let page = slide::find_paginated(&pool, query.page.unwrap_or(1), PER_PAGE, &filter).await?;
        (Some(page), vec![])
    };
    let slideshows = slideshow::find_choices(&pool).await?;

    let echo = SlideListQuery {
        slideshow: query.slideshow.clone(),
        media_type: query.media_type.clone(),
        q: query.q.clone(),
        filter_query: filter_query(&[
            ("slideshow", query.slideshow.as_str()),
            ("media_type", query.media_type.as_str()),
            ("q", query.q.as_str()),
        ]),
    };

    let tmpl = SlideListTemplate {
        ctx,
        page,
        groups,
        query: echo,
        slideshows,
        media_types: MediaType::ALL,
    };
    render(tmpl)
}
