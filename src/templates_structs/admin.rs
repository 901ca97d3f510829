use askama::Template;

use crate::config::AdminSite;
use crate::models::slide::{MediaType, Slide, SlideForm, SlideGroup, SlidePage};
use crate::models::slideshow::{Slideshow, SlideshowForm, SlideshowListItem, SlideshowPage, Theme};
use crate::models::user::UserOption;
use super::AdminContext;

#[derive(Template)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub site: AdminSite,
    pub error: Option<String>,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "admin/index.html")]
pub struct AdminIndexTemplate {
    pub ctx: AdminContext,
    pub slideshow_count: i64,
    pub slide_count: i64,
    pub recent: Vec<SlideshowListItem>,
}

/// Current values of the slideshow list filters, echoed back into the form.
#[derive(Debug, Default)]
pub struct SlideshowListQuery {
    pub q: String,
    pub public: String,
    pub owner: String,
    pub theme: String,
    /// Encoded filters without `page`, for pagination links.
    pub filter_query: String,
}

#[derive(Template)]
#[template(path = "admin/slideshow_list.html")]
pub struct SlideshowListTemplate {
    pub ctx: AdminContext,
    pub page: SlideshowPage,
    pub query: SlideshowListQuery,
    pub owners: Vec<UserOption>,
    pub themes: [Theme; 4],
    pub media_url: String,
}

/// Slideshow form field values as strings, so rejected input can be redisplayed.
#[derive(Debug)]
pub struct SlideshowFields {
    pub owner_id: String,
    pub title: String,
    pub title_fa: String,
    pub date_of_birth: String,
    pub date_of_death: String,
    pub description: String,
    pub description_fa: String,
    pub main_image: String,
    pub music: String,
    pub profile_theme: String,
    pub slide_theme: String,
    pub is_public: bool,
}

impl Default for SlideshowFields {
    fn default() -> Self {
        Self {
            owner_id: String::new(),
            title: String::new(),
            title_fa: String::new(),
            date_of_birth: String::new(),
            date_of_death: String::new(),
            description: String::new(),
            description_fa: String::new(),
            main_image: String::new(),
            music: String::new(),
            profile_theme: Theme::default().as_str().to_string(),
            slide_theme: Theme::default().as_str().to_string(),
            is_public: true,
        }
    }
}

impl From<&Slideshow> for SlideshowFields {
    fn from(s: &Slideshow) -> Self {
        let date = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
        Self {
            owner_id: s.owner_id.to_string(),
            title: s.title.en.clone(),
            title_fa: s.title.fa.clone(),
            date_of_birth: date(s.date_of_birth),
            date_of_death: date(s.date_of_death),
            description: s.description.en.clone(),
            description_fa: s.description.fa.clone(),
            main_image: s.main_image.clone().unwrap_or_default(),
            music: s.music.clone().unwrap_or_default(),
            profile_theme: s.profile_theme.as_str().to_string(),
            slide_theme: s.slide_theme.as_str().to_string(),
            is_public: s.is_public,
        }
    }
}

impl From<&SlideshowForm> for SlideshowFields {
    fn from(f: &SlideshowForm) -> Self {
        Self {
            owner_id: f.owner_id.clone(),
            title: f.title.clone(),
            title_fa: f.title_fa.clone(),
            date_of_birth: f.date_of_birth.clone(),
            date_of_death: f.date_of_death.clone(),
            description: f.description.clone(),
            description_fa: f.description_fa.clone(),
            main_image: f.main_image.clone(),
            music: f.music.clone(),
            profile_theme: f.profile_theme.clone(),
            slide_theme: f.slide_theme.clone(),
            is_public: f.is_public.is_some(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/slideshow_form.html")]
pub struct SlideshowFormTemplate {
    pub ctx: AdminContext,
    pub form_action: String,
    pub form_title: String,
    pub fields: SlideshowFields,
    /// The stored slideshow when editing: read-only fields and the slide table.
    pub existing: Option<Slideshow>,
    pub slides: Vec<Slide>,
    pub owners: Vec<UserOption>,
    pub themes: [Theme; 4],
    pub media_url: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Default)]
pub struct SlideListQuery {
    pub slideshow: String,
    pub media_type: String,
    pub q: String,
    pub filter_query: String,
}

#[derive(Template)]
#[template(path = "admin/slide_list.html")]
pub struct SlideListTemplate {
    pub ctx: AdminContext,
    /// Flat, paginated list when any filter is set.
    pub page: Option<SlidePage>,
    /// Per-slideshow groups when no filter is set.
    pub groups: Vec<SlideGroup>,
    pub query: SlideListQuery,
    pub slideshows: Vec<(i64, String)>,
    pub media_types: [MediaType; 4],
}

#[derive(Debug, Default)]
pub struct SlideFields {
    pub slideshow_id: String,
    pub media_type: String,
    pub media_file: String,
    pub caption: String,
    pub caption_fa: String,
    pub order: String,
}

impl From<&Slide> for SlideFields {
    fn from(s: &Slide) -> Self {
        Self {
            slideshow_id: s.slideshow_id.to_string(),
            media_type: s.media_type.as_str().to_string(),
            media_file: s.media_file.clone(),
            caption: s.caption.en.clone(),
            caption_fa: s.caption.fa.clone(),
            order: s.order.to_string(),
        }
    }
}

impl From<&SlideForm> for SlideFields {
    fn from(f: &SlideForm) -> Self {
        Self {
            slideshow_id: f.slideshow_id.clone(),
            media_type: f.media_type.clone(),
            media_file: f.media_file.clone(),
            caption: f.caption.clone(),
            caption_fa: f.caption_fa.clone(),
            order: f.order.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/slide_form.html")]
pub struct SlideFormTemplate {
    pub ctx: AdminContext,
    pub form_action: String,
    pub form_title: String,
    pub fields: SlideFields,
    pub slideshows: Vec<(i64, String)>,
    pub media_types: [MediaType; 4],
    pub media_url: String,
    pub errors: Vec<String>,
}
