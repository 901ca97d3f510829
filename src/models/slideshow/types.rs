use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::i18n::Localized;

/// Visual theme for the profile page or the slide player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Modern,
    Classic,
    Elegant,
    Serene,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Modern, Theme::Classic, Theme::Elegant, Theme::Serene];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Modern => "modern",
            Theme::Classic => "classic",
            Theme::Elegant => "elegant",
            Theme::Serene => "serene",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Modern => "Modern",
            Theme::Classic => "Classic",
            Theme::Elegant => "Classic & Elegant",
            Theme::Serene => "Nature-Inspired & Serene",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown theme: {s}"))
    }
}

/// A memorial profile with its metadata. Slides are loaded separately.
#[derive(Debug, Clone)]
pub struct Slideshow {
    pub id: i64,
    pub owner_id: i64,
    pub title: Localized<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    pub description: Localized<String>,
    pub main_image: Option<String>,
    pub music: Option<String>,
    pub profile_theme: Theme,
    pub slide_theme: Theme,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
    pub visit_count: i64,
}

impl Slideshow {
    /// Life span as shown in the admin list.
    pub fn date_range(&self) -> String {
        match (self.date_of_birth, self.date_of_death) {
            (Some(b), Some(d)) => format!("{b} - {d}"),
            (Some(b), None) => format!("Born: {b}"),
            (None, Some(d)) => format!("Died: {d}"),
            (None, None) => "-".to_string(),
        }
    }
}

impl fmt::Display for Slideshow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "None".to_string());
        write!(f, "{} ({} - {})", self.title.en, show(self.date_of_birth), show(self.date_of_death))
    }
}

/// Database row shape; converted into [`Slideshow`].
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SlideshowRow {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub title_fa: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    pub description: String,
    pub description_fa: String,
    pub main_image: Option<String>,
    pub music: Option<String>,
    pub profile_theme: String,
    pub slide_theme: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
    pub visit_count: i64,
}

impl From<SlideshowRow> for Slideshow {
    fn from(row: SlideshowRow) -> Self {
        Slideshow {
            id: row.id,
            owner_id: row.owner_id,
            title: Localized::new(row.title, row.title_fa),
            date_of_birth: row.date_of_birth,
            date_of_death: row.date_of_death,
            description: Localized::new(row.description, row.description_fa),
            main_image: row.main_image,
            music: row.music,
            // Column CHECK constraints keep these parseable.
            profile_theme: row.profile_theme.parse().unwrap_or_default(),
            slide_theme: row.slide_theme.parse().unwrap_or_default(),
            slug: row.slug,
            created_at: row.created_at,
            is_public: row.is_public,
            visit_count: row.visit_count,
        }
    }
}

/// Everything needed to create a slideshow. The slug is allocated on insert.
///
/// `main_image` and `music` are raw references: bare filenames are placed
/// under the allocated slug's upload directory.
#[derive(Debug, Clone)]
pub struct NewSlideshow {
    pub owner_id: i64,
    pub title: Localized<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    pub description: Localized<String>,
    pub main_image: Option<String>,
    pub music: Option<String>,
    pub profile_theme: Theme,
    pub slide_theme: Theme,
    pub is_public: bool,
}

/// Editable fields. Slug, creation time and visit count are never updated.
#[derive(Debug, Clone)]
pub struct SlideshowUpdate {
    pub owner_id: i64,
    pub title: Localized<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    pub description: Localized<String>,
    pub main_image: Option<String>,
    pub music: Option<String>,
    pub profile_theme: Theme,
    pub slide_theme: Theme,
    pub is_public: bool,
}

/// Row in the admin slideshow list.
#[derive(Debug, Clone)]
pub struct SlideshowListItem {
    pub slideshow: Slideshow,
    pub owner_username: String,
    pub slide_count: i64,
}

/// Filters for the admin slideshow list.
#[derive(Debug, Clone, Default)]
pub struct SlideshowFilter {
    pub search: Option<String>,
    pub is_public: Option<bool>,
    pub owner_id: Option<i64>,
    pub theme: Option<Theme>,
}

/// Pagination metadata for the admin slideshow list.
pub struct SlideshowPage {
    pub items: Vec<SlideshowListItem>,
    pub page: i64,
    pub per_page: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

/// Form data from the admin create/edit slideshow forms.
#[derive(Debug, Deserialize)]
pub struct SlideshowForm {
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub title_fa: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub date_of_death: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_fa: String,
    #[serde(default)]
    pub main_image: String,
    #[serde(default)]
    pub music: String,
    #[serde(default)]
    pub profile_theme: String,
    #[serde(default)]
    pub slide_theme: String,
    /// Checkbox: present ("on") when checked.
    pub is_public: Option<String>,
    pub csrf_token: String,
}
