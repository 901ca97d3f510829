use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::config::AdminSite;
use crate::errors::{AppError, render};
use crate::handlers::admin_handlers::filter_query;
use crate::media::MediaConfig;
use crate::models::{slideshow, user};
use crate::models::slideshow::{SlideshowFilter, Theme};
use crate::templates_structs::{AdminContext, SlideshowListQuery, SlideshowListTemplate};

const PER_PAGE: i64 = 25;

#[derive(Deserialize)]
pub struct ListQuery {
    page: Option<i64>,
    #[serde(default)]
    q: String,
    #[serde(default)]
    public: String,
    #[serde(default)]
    owner: String,
    #[serde(default)]
    theme: String,
}

impl ListQuery {
    /// Unrecognised filter values are ignored rather than rejected.
    fn filter(&self) -> SlideshowFilter {
        SlideshowFilter {
            search: Some(self.q.clone()).filter(|q| !q.trim().is_empty()),
            is_public: match self.public.as_str() {
                "1" => Some(true),
                "0" => Some(false),
                _ => None,
            },
            owner_id: self.owner.parse().ok(),
            theme: self.theme.parse().ok(),
        }
    }
}

pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
    site: web::Data<AdminSite>,
    media: web::Data<MediaConfig>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let ctx = AdminContext::build(&session, &site, "/admin/slideshows");
    let page = slideshow::find_paginated(&pool, query.page.unwrap_or(1), PER_PAGE, &query.filter()).await?;
    let owners = user::find_options(&pool).await?;

    let echo = SlideshowListQuery {
        q: query.q.clone(),
        public: query.public.clone(),
        owner: query.owner.clone(),
        theme: query.theme.clone(),
        filter_query: filter_query(&[
            ("q", query.q.as_str()),
            ("public", query.public.as_str()),
            ("owner", query.owner.as_str()),
            ("theme", query.theme.as_str()),
        ]),
    };

    let tmpl = SlideshowListTemplate {
        ctx,
        page,
        query: echo,
        owners,
        themes: Theme::ALL,
        media_url: media.url_prefix.clone(),
    };
    render(tmpl)
}
