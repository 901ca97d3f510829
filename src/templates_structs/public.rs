use askama::Template;

use crate::i18n::Language;
use crate::models::slideshow::{ProfileView, SlideshowView};

/// Fixed page text in the visitor's language.
pub struct Labels {
    pub born: &'static str,
    pub died: &'static str,
    pub visits: &'static str,
    pub view_slides: &'static str,
    pub back_to_profile: &'static str,
    pub no_slides: &'static str,
    pub switch_language: &'static str,
    pub previous: &'static str,
    pub next: &'static str,
    pub pause: &'static str,
    pub play: &'static str,
    pub mute: &'static str,
    pub unmute: &'static str,
}

impl Labels {
    pub fn for_lang(lang: Language) -> Self {
        match lang {
            Language::En => Labels {
                born: "Born",
                died: "Passed away",
                visits: "Visits",
                view_slides: "View slideshow",
                back_to_profile: "Back to profile",
                no_slides: "No slides yet.",
                switch_language: "فارسی",
                previous: "Previous",
                next: "Next",
                pause: "Pause",
                play: "Play",
                mute: "Mute",
                unmute: "Unmute",
            },
            Language::Fa => Labels {
                born: "تولد",
                died: "درگذشت",
                visits: "بازدید",
                view_slides: "مشاهده اسلایدها",
                back_to_profile: "بازگشت به پروفایل",
                no_slides: "هنوز اسلایدی اضافه نشده است.",
                switch_language: "English",
                previous: "قبلی",
                next: "بعدی",
                pause: "توقف",
                play: "پخش",
                mute: "بی‌صدا",
                unmute: "صدا",
            },
        }
    }
}

#[derive(Template)]
#[template(path = "public/profile.html")]
pub struct ProfileTemplate {
    pub view: ProfileView,
    pub labels: Labels,
}

#[derive(Template)]
#[template(path = "public/slides.html")]
pub struct SlidesTemplate {
    pub view: SlideshowView,
    pub labels: Labels,
    /// Set when arriving from the profile's start button: music starts at once.
    pub autoplay: bool,
}
