//! View models handed to the public templates and the JSON API.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::i18n::Language;
use crate::jalali::JalaliDate;
use crate::media::MediaConfig;
use crate::models::slide::{MediaType, Slide};
use super::types::{Slideshow, Theme};

/// A life date in the display calendar of the chosen language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayDate {
    pub date: String,
    pub year: String,
}

impl DisplayDate {
    /// Jalali for Farsi, Gregorian otherwise.
    pub fn new(date: NaiveDate, lang: Language) -> Self {
        match lang {
            Language::Fa => {
                let j = JalaliDate::from_gregorian(date);
                DisplayDate { date: j.to_string(), year: j.year.to_string() }
            }
            Language::En => DisplayDate {
                date: date.format("%Y-%m-%d").to_string(),
                year: date.year().to_string(),
            },
        }
    }
}

/// Profile page content.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub slug: String,
    pub lang: Language,
    pub title: String,
    pub description: String,
    pub theme: Theme,
    pub main_image_url: Option<String>,
    pub music_url: Option<String>,
    /// Missing dates are omitted, never an error.
    pub born: Option<DisplayDate>,
    pub died: Option<DisplayDate>,
    pub visit_count: i64,
}

impl ProfileView {
    pub fn build(show: &Slideshow, lang: Language, media: &MediaConfig) -> Self {
        ProfileView {
            slug: show.slug.clone(),
            lang,
            title: show.title.resolve(lang).clone(),
            description: show.description.resolve(lang).clone(),
            theme: show.profile_theme,
            main_image_url: media.url_opt(show.main_image.as_deref()),
            music_url: media.url_opt(show.music.as_deref()),
            born: show.date_of_birth.map(|d| DisplayDate::new(d, lang)),
            died: show.date_of_death.map(|d| DisplayDate::new(d, lang)),
            visit_count: show.visit_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SlideView {
    pub id: i64,
    pub order: i32,
    pub media_type: MediaType,
    pub media_url: Option<String>,
    pub caption: String,
}

/// Slide player content: the profile plus its slides in display order.
#[derive(Debug, Clone, Serialize)]
pub struct SlideshowView {
    #[serde(flatten)]
    pub profile: ProfileView,
    pub slide_theme: Theme,
    pub slides: Vec<SlideView>,
}

impl SlideshowView {
    /// `slides` may arrive in any order; the view sorts them by position.
    pub fn build(show: &Slideshow, slides: &[Slide], lang: Language, media: &MediaConfig) -> Self {
        let mut ordered: Vec<&Slide> = slides.iter().collect();
        ordered.sort_by_key(|s| (s.order, s.id));

        SlideshowView {
            profile: ProfileView::build(show, lang, media),
            slide_theme: show.slide_theme,
            slides: ordered
                .into_iter()
                .map(|s| SlideView {
                    id: s.id,
                    order: s.order,
                    media_type: s.media_type,
                    media_url: media.url_opt(Some(&s.media_file)),
                    caption: s.caption.resolve(lang).clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Localized;
    use chrono::Utc;

    fn slideshow(born: Option<NaiveDate>, died: Option<NaiveDate>) -> Slideshow {
        Slideshow {
            id: 1,
            owner_id: 1,
            title: Localized::new("Jane Doe".to_string(), "جین دو".to_string()),
            date_of_birth: born,
            date_of_death: died,
            description: Localized::new("Beloved".to_string(), String::new()),
            main_image: Some("slideshows/jane-doe/portrait.jpg".to_string()),
            music: None,
            profile_theme: Theme::Classic,
            slide_theme: Theme::Serene,
            slug: "jane-doe".to_string(),
            created_at: Utc::now(),
            is_public: true,
            visit_count: 7,
        }
    }

    fn slide(id: i64, order: i32, caption: &str) -> Slide {
        Slide {
            id,
            slideshow_id: 1,
            media_type: MediaType::Image,
            media_file: format!("slideshows/jane-doe/{id}.jpg"),
            caption: Localized::new(caption.to_string(), format!("fa {caption}")),
            order,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn english_profile_uses_gregorian_dates() {
        let view = ProfileView::build(&slideshow(ymd(1950, 6, 1), ymd(2024, 3, 20)), Language::En, &MediaConfig::default());
        assert_eq!(view.title, "Jane Doe");
        assert_eq!(view.theme, Theme::Classic);
        assert_eq!(view.born.as_ref().map(|d| d.year.as_str()), Some("1950"));
        assert_eq!(view.died.as_ref().map(|d| d.date.as_str()), Some("2024-03-20"));
        assert_eq!(view.main_image_url.as_deref(), Some("/media/slideshows/jane-doe/portrait.jpg"));
        assert_eq!(view.music_url, None);
    }

    #[test]
    fn farsi_profile_uses_jalali_dates_and_farsi_fields() {
        let view = ProfileView::build(&slideshow(ymd(1979, 2, 11), ymd(2024, 3, 20)), Language::Fa, &MediaConfig::default());
        assert_eq!(view.title, "جین دو");
        // No fallback to the English description.
        assert_eq!(view.description, "");
        let died = view.died.expect("death date");
        assert_eq!(died.date, "1403/01/01");
        assert_eq!(died.year, "1403");
        assert_eq!(view.born.map(|d| d.date), Some("1357/11/22".to_string()));
    }

    #[test]
    fn missing_farsi_dates_are_omitted() {
        let view = ProfileView::build(&slideshow(None, ymd(2024, 3, 20)), Language::Fa, &MediaConfig::default());
        assert!(view.born.is_none());
        assert!(view.died.is_some());
    }

    #[test]
    fn slides_are_ordered_by_position() {
        let slides = vec![slide(3, 3, "c"), slide(1, 1, "a"), slide(2, 2, "b")];
        let view = SlideshowView::build(&slideshow(None, None), &slides, Language::Fa, &MediaConfig::default());
        let captions: Vec<&str> = view.slides.iter().map(|s| s.caption.as_str()).collect();
        assert_eq!(captions, ["fa a", "fa b", "fa c"]);
        assert_eq!(view.slide_theme, Theme::Serene);
    }

    #[test]
    fn view_serializes_flat() {
        let view = SlideshowView::build(&slideshow(None, None), &[slide(1, 1, "a")], Language::En, &MediaConfig::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["slug"], "jane-doe");
        assert_eq!(json["lang"], "en");
        assert_eq!(json["slides"][0]["media_type"], "image");
    }
}
