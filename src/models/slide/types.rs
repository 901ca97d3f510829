use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::i18n::Localized;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
    Gif,
    Audio,
}

impl MediaType {
    pub const ALL: [MediaType; 4] = [MediaType::Image, MediaType::Video, MediaType::Gif, MediaType::Audio];

    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Gif => "gif",
            MediaType::Audio => "audio",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaType::Image => "Image",
            MediaType::Video => "Video",
            MediaType::Gif => "GIF",
            MediaType::Audio => "Audio",
        }
    }

    /// Rendered with an `<img>` tag (GIFs animate on their own).
    pub fn is_picture(self) -> bool {
        matches!(self, MediaType::Image | MediaType::Gif)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Unknown media type: {s}"))
    }
}

/// One media item within a slideshow.
#[derive(Debug, Clone)]
pub struct Slide {
    pub id: i64,
    pub slideshow_id: i64,
    pub media_type: MediaType,
    pub media_file: String,
    pub caption: Localized<String>,
    pub order: i32,
}

impl fmt::Display for Slide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slide {}", self.order)
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SlideRow {
    pub id: i64,
    pub slideshow_id: i64,
    pub media_type: String,
    pub media_file: String,
    pub caption: String,
    pub caption_fa: String,
    pub sort_order: i32,
}

impl From<SlideRow> for Slide {
    fn from(row: SlideRow) -> Self {
        Slide {
            id: row.id,
            slideshow_id: row.slideshow_id,
            media_type: row.media_type.parse().unwrap_or_default(),
            media_file: row.media_file,
            caption: Localized::new(row.caption, row.caption_fa),
            order: row.sort_order,
        }
    }
}

/// Slide creation or full edit. `order: None` appends after the last slide.
#[derive(Debug, Clone)]
pub struct SlideInput {
    pub slideshow_id: i64,
    pub media_type: MediaType,
    pub media_file: String,
    pub caption: Localized<String>,
    pub order: Option<i32>,
}

/// Row in the admin slide list.
#[derive(Debug, Clone)]
pub struct SlideListItem {
    pub slide: Slide,
    pub slideshow_title: String,
    pub slideshow_slug: String,
    pub owner_username: String,
}

impl SlideListItem {
    /// Caption shortened for list display, English first.
    pub fn caption_preview(&self) -> String {
        let caption = [&self.slide.caption.en, &self.slide.caption.fa]
            .into_iter()
            .find(|c| !c.trim().is_empty())
            .map(|c| c.as_str())
            .unwrap_or("-");
        if caption.chars().count() > 50 {
            format!("{}...", caption.chars().take(50).collect::<String>())
        } else {
            caption.to_string()
        }
    }
}

/// Slides of one slideshow, for the grouped admin view.
#[derive(Debug, Clone)]
pub struct SlideGroup {
    pub slideshow_id: i64,
    pub title: String,
    pub slug: String,
    pub owner_username: String,
    pub slides: Vec<Slide>,
}

/// Filters for the admin slide list.
#[derive(Debug, Clone, Default)]
pub struct SlideFilter {
    pub slideshow_id: Option<i64>,
    pub media_type: Option<MediaType>,
    pub search: Option<String>,
}

impl SlideFilter {
    pub fn is_empty(&self) -> bool {
        self.slideshow_id.is_none()
            && self.media_type.is_none()
            && self.search.as_deref().is_none_or(|q| q.trim().is_empty())
    }
}

pub struct SlidePage {
    pub items: Vec<SlideListItem>,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

/// Form data from the admin create/edit slide forms.
#[derive(Debug, Deserialize)]
pub struct SlideForm {
    pub slideshow_id: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub media_file: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub caption_fa: String,
    #[serde(default)]
    pub order: String,
    pub csrf_token: String,
}
